#![allow(dead_code)]

pub mod driver;
pub mod vim_grammar;
