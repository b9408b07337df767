//! Outer adapters. Only HTTP for now.

pub mod http;
