use log::LevelFilter;

#[derive(Debug, Default, Clone)]
pub struct AppSettings {
    pub full_screen: bool,
    pub log_level: Option<LevelFilter>,
}

impl AppSettings {
    /// `ARENA_LOG` picks the log level shown in the log pane.
    pub fn load() -> Self {
        Self::from_level(std::env::var("ARENA_LOG").ok().as_deref())
    }

    fn from_level(raw: Option<&str>) -> Self {
        let log_level = raw.and_then(|level| level.trim().parse::<LevelFilter>().ok());
        Self { full_screen: false, log_level }
    }

    pub fn effective_log_level(&self) -> LevelFilter {
        self.log_level.unwrap_or(LevelFilter::Info)
    }
}
