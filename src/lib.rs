pub mod config;
pub mod dashboard;
pub mod df_utils;
pub mod error;
pub mod ext;
pub mod model;
pub mod ta;
pub mod time_utils;

pub mod prelude {
    pub use crate::config::EnvConf;
    pub use crate::dashboard::{
        InertiaParams, InertiaSnapshot, chart_title, page_file_name, process_data,
        trailing_window,
    };
    pub use crate::df_utils::*;
    pub use crate::error::*;
    pub use crate::model::*;
    pub use crate::time_utils::*;
}
