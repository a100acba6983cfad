#![allow(dead_code)]

pub mod env;
