mod status;

pub use status::run_status;
