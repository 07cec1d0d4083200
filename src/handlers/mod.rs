pub mod admin;
pub mod api;
pub mod auth;
pub mod events;
pub mod messages;
pub mod resources;
pub mod settings;
pub mod shared;
pub mod sitemap;
pub mod stream;
pub mod team_members;
