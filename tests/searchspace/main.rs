#![allow(clippy::cast_precision_loss, clippy::float_cmp)]

mod builder;
mod constraints;
mod continuous;
mod creation;
mod matching;
mod memory;
mod transform;
mod workflow;
