use tracing_subscriber::EnvFilter;
use yaml_cascade::Config;

fn main() -> Result<(), yaml_cascade::ConfigError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Resolves NODE_CONFIG_DIR / NODE_CONFIG_ENV from flags and the environment.
    let config = Config::load()?;

    println!("environment: {}", config.environment());
    println!("directory:   {}", config.dir().display());
    for source in config.sources() {
        println!("merged:      {}", source.display());
    }

    let property = std::env::args()
        .skip(1)
        .find(|arg| !arg.starts_with("--"))
        .unwrap_or_else(|| "app.name".to_string());

    if config.has(property.as_str()) {
        println!("{property} = {:?}", config.get(property.as_str())?);
    } else {
        println!("{property} is not set");
    }

    Ok(())
}
