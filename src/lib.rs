//! # route-picker
//!
//! Client for picking a start and end point on a map, querying a routing
//! backend for alternative routes between them, and deriving a
//! traffic-colored draw plan for the result.
//!
//! ```no_run
//! use route_picker::{ApiClient, ClientConfig, Event, Point, RouteBuilder};
//!
//! # async fn demo() -> route_picker::Result<()> {
//! let client = ApiClient::new(ClientConfig::from_env()?)?;
//! let mut builder = RouteBuilder::new(client);
//!
//! builder.handle(Event::ContextClick(Point::new(50.40, 30.50)))?;
//! builder.handle(Event::ConfirmStart)?;
//! builder.handle(Event::ContextClick(Point::new(50.46, 30.55)))?;
//! builder.handle(Event::ConfirmEnd)?;
//! builder.wait_idle().await;
//!
//! println!("{} route(s)", builder.session().routes().len());
//! # Ok(())
//! # }
//! ```

pub mod core;

pub use crate::core::builder::RouteBuilder;
pub use crate::core::client::ApiClient;
pub use crate::core::config::{ClientConfig, MapView};
pub use crate::core::error::{Error, Result};
pub use crate::core::model::{Point, Route, RouteQuery, Segment, TrafficLevel};
pub use crate::core::render::{draw_plan, RouteStyle, Stroke, StrokeLayer};
pub use crate::core::session::{Confirmation, Effect, Event, Phase, Session, Ticket, TransitionError};
