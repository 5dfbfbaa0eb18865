//! # sb-services
//!
//! Application services built on the sb-core ports: the announcement
//! repository, display settings and the display scheduler.

pub mod repository;
pub mod scheduler;
pub mod seed;
pub mod settings;

pub use repository::{AnnouncementRepository, RepositoryOptions};
pub use scheduler::{Carousel, DisplayScheduler, Slide};
pub use settings::SettingsService;
