#![allow(dead_code)]

pub mod avi;
pub mod env;
pub mod samples;
