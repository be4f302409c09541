//! Route-data types described by `routes.json`, plus their generated glue.

#![allow(missing_docs, dead_code, clippy::all, clippy::pedantic, clippy::nursery)]

use crate::route_runtime::NavigatorKey;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    DarkBlue,
    Green,
}

/// Opaque payload carried next to a location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft(pub String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeRoute {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyRoute {
    pub fid: String,
}

impl FamilyRoute {
    pub fn new(fid: String) -> Self {
        Self { fid }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonRoute {
    pub fid: String,
    pub pid: u32,
    pub color: Color,
    pub tags: Vec<Color>,
    pub note: Option<String>,
    pub extra: Option<Draft>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRoute {
    pub q: String,
    pub page_size: u32,
    pub exact: bool,
    pub sort: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppShell {}

impl AppShell {
    pub const NAVIGATOR_KEY: NavigatorKey = NavigatorKey("app");
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsRoute {
    pub extra: Draft,
}

include!(concat!(env!("OUT_DIR"), "/routes.rs"));
