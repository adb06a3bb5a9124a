pub mod browser_protocol;
pub mod events;
pub mod js_protocol;
