//! Restroom catalog: the QR-labelled locations reports are filed against.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/restrooms` | Catalog listing (alias `/api/banos`) |
//! | GET | `/api/restrooms/{id}` | Active restroom lookup |
//! | PUT | `/api/restrooms/{id}` | Create or replace |
//! | DELETE | `/api/restrooms/{id}` | Delete when no reports reference it |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::RestroomService;
