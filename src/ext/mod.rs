mod path_display_ext;
mod system_time_ext;

pub use path_display_ext::PathDisplayExt;
pub use system_time_ext::SystemTimeExt;
