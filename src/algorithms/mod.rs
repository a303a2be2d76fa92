pub mod annotation;
pub mod common;
pub mod discords;
pub mod distance_profile;
pub mod engine;
pub mod mass;
pub mod stampi;
pub mod stomp;
