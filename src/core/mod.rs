pub mod attachments;
pub mod config;
pub mod controller;
pub mod conversation;
pub mod message;
pub mod providers;
pub mod remote;
pub mod response_service;
pub mod session;
pub mod simulate;
