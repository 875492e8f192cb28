use super::catalog::Catalogs;
use super::error::{Error, Result};
use super::player::PlayerProfile;
use super::potion::{Potion, PotionBuilder};

/// Every potion that can be brewed from 2 or 3 of `names`.
///
/// Duplicate names are ignored. Unknown names fail the whole call; candidate
/// sets that cannot form a potion are skipped. Pairs come first, then
/// triples, both in index order.
pub fn generate<S: AsRef<str>>(
    names: &[S],
    catalogs: &Catalogs,
    player: &PlayerProfile,
) -> Result<Vec<Potion>> {
    let mut unique: Vec<&str> = Vec::with_capacity(names.len());
    for n in names {
        let n = n.as_ref();
        if !unique.contains(&n) {
            catalogs.ingredient(n)?;
            unique.push(n);
        }
    }

    let builder = PotionBuilder::new(catalogs, player);
    let mut potions = vec![];
    let n = unique.len();

    for i in 0..n {
        for j in i + 1..n {
            try_build(&builder, &[unique[i], unique[j]], &mut potions)?;
        }
    }
    for i in 0..n {
        for j in i + 1..n {
            for k in j + 1..n {
                try_build(&builder, &[unique[i], unique[j], unique[k]], &mut potions)?;
            }
        }
    }

    Ok(potions)
}

fn try_build(builder: &PotionBuilder, names: &[&str], potions: &mut Vec<Potion>) -> Result<()> {
    match builder.build(names) {
        Ok(p) => {
            potions.push(p);
            Ok(())
        }
        Err(Error::Construction(_)) => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alchemy::error::ConfigurationError;
    use crate::alchemy::ingredient::Rarity::Common;
    use crate::alchemy::test_support::{fixture_catalogs, ingredient};

    #[test]
    fn triple_needs_a_three_way_intersection() {
        // every pair shares something, the three together share nothing
        let catalogs = fixture_catalogs(vec![
            ingredient("P", ["A", "B", "I", "J"], Common),
            ingredient("Q", ["A", "C", "K", "L"], Common),
            ingredient("R", ["B", "C", "G", "H"], Common),
        ]);
        let player = PlayerProfile::base();
        let potions = generate(&["P", "Q", "R"], &catalogs, &player).unwrap();

        assert_eq!(potions.len(), 3);
        assert!(potions.iter().all(|p| p.ingredient_names().len() == 2));
        assert!(PotionBuilder::new(&catalogs, &player)
            .build(&["P", "Q", "R"])
            .is_err());
    }

    #[test]
    fn triple_included_when_all_share() {
        let catalogs = fixture_catalogs(vec![
            ingredient("P", ["A", "B", "I", "J"], Common),
            ingredient("Q", ["A", "C", "K", "L"], Common),
            ingredient("R", ["A", "D", "G", "H"], Common),
            ingredient("S", ["E", "F", "G", "K"], Common),
        ]);
        let player = PlayerProfile::base();
        let potions = generate(&["P", "Q", "R", "S"], &catalogs, &player).unwrap();

        let triples: Vec<&Potion> = potions
            .iter()
            .filter(|p| p.ingredient_names().len() == 3)
            .collect();
        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].ingredient_names(), ["P", "Q", "R"]);
        // pairs: PQ, PR, QR, QS, RS
        assert_eq!(potions.len(), 6);
    }

    #[test]
    fn duplicates_are_ignored() {
        let catalogs = Catalogs::bundled().unwrap();
        let player = PlayerProfile::base();
        let once = generate(&["Wheat", "Blue Mountain Flower"], &catalogs, &player).unwrap();
        let twice = generate(
            &["Wheat", "Blue Mountain Flower", "Wheat"],
            &catalogs,
            &player,
        )
        .unwrap();
        assert_eq!(once, twice);
        assert_eq!(once.len(), 1);
    }

    #[test]
    fn unknown_name_fails_the_call() {
        let catalogs = Catalogs::bundled().unwrap();
        let player = PlayerProfile::base();
        let err = generate(&["Wheat", "Unobtainium"], &catalogs, &player).unwrap_err();
        assert!(matches!(
            err,
            Error::Configuration(ConfigurationError::UnknownIngredient(_))
        ));
    }

    #[test]
    fn every_potion_is_valid_and_output_is_deterministic() {
        let catalogs = Catalogs::bundled().unwrap();
        let player = PlayerProfile::base();
        let names = [
            "Bear Claws",
            "Blue Mountain Flower",
            "Butterfly Wing",
            "Wheat",
            "Hanging Moss",
            "Giant's Toe",
            "Creep Cluster",
            "Blisterwort",
            "Glowing Mushroom",
        ];

        let potions = generate(&names, &catalogs, &player).unwrap();
        assert!(!potions.is_empty());
        for p in &potions {
            let n = p.ingredient_names().len();
            assert!((2..=3).contains(&n));
            assert!(!p.effects().is_empty());
            for e in p.effects() {
                for ing in p.ingredient_names() {
                    assert!(catalogs.ingredient(ing).unwrap().has_effect(&e.name));
                }
            }
        }

        assert_eq!(potions, generate(&names, &catalogs, &player).unwrap());
    }

    #[test]
    fn too_few_names() {
        let catalogs = Catalogs::bundled().unwrap();
        let player = PlayerProfile::base();
        assert!(generate(&["Wheat"], &catalogs, &player).unwrap().is_empty());
        assert!(generate::<&str>(&[], &catalogs, &player).unwrap().is_empty());
    }
}
