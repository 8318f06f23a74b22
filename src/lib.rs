pub mod avgle;
pub mod command;
pub mod dispatch;
pub mod dmm;
pub mod http;
pub mod javbus;
pub mod logging;
pub mod provider;
pub mod sukebei;
pub mod translate;
pub mod wiki;
