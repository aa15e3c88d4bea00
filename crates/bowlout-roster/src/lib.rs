//! Bowlout — Roster store and ingestion.
//!
//! Holds the ordered participant list and their alive/eliminated status,
//! and parses `name,number` sources into a fresh roster.

pub mod domain;
