pub mod bearoff;
pub mod board;
pub mod config;
pub mod encode;
pub mod error;
pub mod escape;
pub mod eval;
pub mod heuristic;
pub mod network;

/// dimensional analysis types
pub type Probability = f32;
pub type Equity = f32;

/// board shape parameters
pub const N_SIDES: usize = 2;
pub const N_POINTS: usize = 24;
pub const BAR: usize = 24;
pub const N_LOCATIONS: usize = 25;
pub const MAX_CHEQUERS: u8 = 15;
pub const HOME_POINTS: usize = 6;

/// input vector widths (§4.3)
pub const INPUTS_BASE: usize = 200;
pub const INPUTS_CONTACT: usize = 250;
pub const INPUTS_RACE: usize = 214;
pub const INPUTS_PRUNING: usize = 200;

/// output vector width: (winProb, winGammon, winBackgammon, loseGammon, loseBackgammon)
pub const OUTPUTS: usize = 5;

/// trait for random generation, mainly (strictly?) for testing
pub trait Arbitrary {
    fn random() -> Self;
}

/// initialize logging, mirroring how a long-running trainer/server would wire up
/// its own process; the library itself never calls this on its own.
#[cfg(feature = "native")]
pub fn init_logging() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}
