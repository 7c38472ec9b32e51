//! # Event Bus Module
//!
//! Provides the publish/subscribe channel between the drawing state machine,
//! the segment overlay manager, the feature store and the host UI.
//!
//! ## Overview
//!
//! - Publishers emit typed events without knowing subscribers
//! - Subscribers filter by category and are called synchronously
//! - Each map session owns its own bus; there is no global instance
//!
//! ## Usage
//!
//! ```rust
//! use mapsketch_core::event_bus::{EventBus, EventCategory, EventFilter, FeatureEvent, MapEvent};
//!
//! let bus = EventBus::new();
//! let subscription = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Feature]),
//!     |event| {
//!         if let MapEvent::Feature(feature) = event {
//!             println!("Feature event: {:?}", feature);
//!         }
//!     },
//! );
//!
//! bus.publish(MapEvent::Feature(FeatureEvent::Added { id: 1 }));
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
