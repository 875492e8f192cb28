use alembic::alchemy::error::ConfigurationError;
use alembic::alchemy::generation::{self, GenerationConfig, GenerationStrategy};
use alembic::alchemy::strategy;
use alembic::alchemy::{Catalogs, EffectDescriber, PlayerProfile};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing_subscriber::EnvFilter;

pub struct Fmt<F>(pub F)
where
    F: Fn(&mut fmt::Formatter) -> fmt::Result;

impl<F> fmt::Display for Fmt<F>
where
    F: Fn(&mut fmt::Formatter) -> fmt::Result,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        (self.0)(f)
    }
}

struct Args {
    data: PathBuf,
    seed: Option<u64>,
    inventory: GenerationStrategy,
    strategy: String,
    size: Option<usize>,
}

fn parse_number<T: FromStr>(flag: &str, value: &str) -> Result<T, ConfigurationError> {
    value.parse().map_err(|_| {
        ConfigurationError::InvalidParameters(format!("{} requires a number, got {}", flag, value))
    })
}

fn parse_args() -> Result<Args, ConfigurationError> {
    let args: Vec<String> = std::env::args().collect();
    let mut parsed = Args {
        data: PathBuf::from("data"),
        seed: None,
        inventory: GenerationStrategy::Normal,
        strategy: "basic-greedy".to_string(),
        size: None,
    };

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        let value = args.get(i + 1).ok_or_else(|| {
            ConfigurationError::InvalidParameters(format!("{} requires a value", flag))
        })?;
        match flag {
            "--seed" => parsed.seed = Some(parse_number(flag, value)?),
            "--inventory" => parsed.inventory = value.parse()?,
            "--strategy" => parsed.strategy = value.clone(),
            "--size" => parsed.size = Some(parse_number(flag, value)?),
            "--data" => parsed.data = PathBuf::from(value),
            other => {
                return Err(ConfigurationError::InvalidParameters(format!(
                    "unknown argument {} (expected --seed, --inventory, --strategy, --size or --data)",
                    other
                )))
            }
        }
        i += 2;
    }

    Ok(parsed)
}

fn main() -> alembic::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;

    println!("Loading alchemy database...");
    let catalogs = Catalogs::load(&args.data)?;
    let md = EffectDescriber::new(&catalogs);
    let player = PlayerProfile::base();
    println!("Done!");

    let mut rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let mut inventory = generation::generate(
        args.inventory,
        &catalogs,
        args.size,
        &GenerationConfig::default(),
        &mut rng,
    )?;
    println!("{}\n", inventory);

    let potions = strategy::exhaust(&mut inventory, &args.strategy, &catalogs, &player)?;
    for p in &potions {
        println!("{}", Fmt(|f| p.display(&md, f)));
    }

    let gold: u64 = potions.iter().map(|p| p.total_value() as u64).sum();
    println!("Crafted {} potions worth {} gold", potions.len(), gold);
    println!("Left over: {}", inventory);

    Ok(())
}
