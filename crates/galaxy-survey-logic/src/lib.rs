//! Pure survey logic for galaxy dumps.
//!
//! This crate contains everything the survey pipeline computes, independent
//! of files, formats, or command-line plumbing. Functions take plain data
//! and return results, so each stage is unit-testable and can be driven by
//! the CLI binaries, the headless simtest harness, or anything else.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`records`] | Dump record types: systems, bodies, stations |
//! | [`occupation`] | Station classification and system occupation status |
//! | [`spatial`] | 3-D points, Euclidean distance, k-d tree radius queries |
//! | [`stats`] | Per-system derived metrics (one stats row per system) |
//! | [`candidates`] | Threshold filter and priority ordering of candidates |
//! | [`proximity`] | Candidates within a radius of occupied systems |
//!
//! # Pipeline
//!
//! ```text
//! SystemRecord ──extract──▶ SystemStats ──filter──▶ candidates
//!                                │                      │
//!                                └──── occupied ──▶ KdTree ──join──▶ NearbyCandidate
//! ```

pub mod candidates;
pub mod occupation;
pub mod proximity;
pub mod records;
pub mod spatial;
pub mod stats;
