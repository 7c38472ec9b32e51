#![allow(dead_code)]

mod common;

#[path = "session/drawing.rs"]
mod drawing;
#[path = "session/export.rs"]
mod export;
#[path = "session/layers.rs"]
mod layers;
#[path = "session/length_edit.rs"]
mod length_edit;

#[path = "properties/overlays.rs"]
mod overlays;
