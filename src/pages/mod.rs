pub mod homework;
pub mod notifications;
pub mod profile;
pub mod visits;
