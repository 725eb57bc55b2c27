use papi_observer::event::Event;
use papi_observer::{Papi, Report, Session, SessionOptions};

fn main() -> papi_observer::Result<()> {
    env_logger::init();

    let papi = Papi::init()?;
    let mut session = Session::with_events(
        &papi,
        SessionOptions::default(),
        &[Event::TOT_INS, Event::TOT_CYC],
    )?;

    session.start()?;

    // Do some work
    work();

    session.stop()?;
    print!("{}", Report::from_session(&session)?);

    Ok(())
}

fn work() {
    let collected: u32 = (0..100).map(|x| x * 2).filter(|x| x % 3 == 0).sum();

    println!("Summed up {}", collected);
}
