#![cfg(not(target_arch = "wasm32"))]

mod health_check;
mod helpers;
mod interceptor;
mod login;
mod logout;
mod persistence;
mod resolver;
