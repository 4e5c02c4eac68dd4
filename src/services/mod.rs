pub mod dispatcher;
pub mod push;
pub mod router;
pub mod secrets;
