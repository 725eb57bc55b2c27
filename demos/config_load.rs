fn main() -> papi_observer::Result<()> {
    env_logger::init();

    let path = std::path::Path::new("demos/configuration.toml");
    let config = papi_observer::Config::from_path(path)?;
    let papi = papi_observer::Papi::init()?;

    let mut session = papi_observer::Session::new(&papi, config.options())?;
    session.register_preset(&config, "Flops")?;
    println!("Counting {} of {} events", session.len(), session.events().count());

    Ok(())
}
