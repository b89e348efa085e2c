pub mod conclusion;
pub mod config;
pub mod posterior;
pub mod ports;
pub mod registry;
pub mod service;
pub mod store;

/// dimensional analysis types
pub type Probability = f64;
pub type ArmId = usize;

/// Monte Carlo sample counts. Overridable via [`config::Config`].
pub const M_HOT: usize = 1_000;
pub const M_STOP: usize = 10_000;

/// Default posterior-probability stopping threshold.
pub const DEFAULT_THRESHOLD: Probability = 0.95;

/// Default Conclusion Engine sweep cadence, in seconds.
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 1_800;

/// Default outbound annotation-sink timeout, in seconds.
pub const DEFAULT_ANNOTATION_TIMEOUT_SECS: u64 = 10;

/// initialize logging: terminal sink at Info, rotating file sink at Debug.
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
