// JSON API: recipe CRUD, import and uploads

pub mod handlers;
pub mod models;
pub mod routes;
