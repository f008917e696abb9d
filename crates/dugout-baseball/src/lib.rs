// Player evaluation and roster construction core.
//
// Raw records flow one way: conversion -> ratings -> value / archetype /
// composite scores -> slot-by-slot selection -> roster -> summary. Nothing
// here touches the filesystem or global state.

pub mod archetype;
pub mod contract;
pub mod evaluation;
pub mod generation;
pub mod philosophy;
pub mod player;
pub mod position;
pub mod ratings;
pub mod record;
pub mod roster;
pub mod scoring;
pub mod summary;
pub mod trade_value;
