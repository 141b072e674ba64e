//! Flight constants and configuration defaults
//!
//! This module centralizes the reserved identifiers and tuning values used throughout the crate.

// ============================================================================
// RESERVED ROUTE IDENTIFIERS
// ============================================================================

/// Raw identifier of the Entry sentinel
pub const ENTRY_ID: i32 = -1;

/// Raw identifier of the Exit sentinel
pub const EXIT_ID: i32 = -2;

/// Raw identifier of the gap marker
pub const GAP_ID: i32 = 0;

/// Largest waypoint identifier, so every id has a positive raw form
pub const MAX_WAYPOINT_ID: u32 = i32::MAX as u32;

// ============================================================================
// FLIGHT SPEED
// ============================================================================

/// Default cruise speed between waypoints (metres per second)
pub const DEFAULT_BASE_SPEED: f32 = 1.0;

/// Lowest accepted speed multiplier
pub const MIN_SPEED_MULTIPLIER: f32 = 0.1;

/// Highest accepted speed multiplier
pub const MAX_SPEED_MULTIPLIER: f32 = 10.0;

/// Speed used for the vertical recording detour (not scaled by the multiplier)
pub const DETOUR_SPEED: f32 = 0.5;

// ============================================================================
// ARRIVAL PROTOCOLS
// ============================================================================

/// Default hold time at a waypoint (seconds)
pub const DEFAULT_HOLD_TIME: f32 = 2.0;

/// Duration of a full recording rotation (seconds)
pub const ROTATION_360_DURATION: f32 = 4.0;

/// Short pause inserted around the recording detour (seconds)
pub const DETOUR_PAUSE: f32 = 0.5;

/// Anchor and recording positions closer than this are treated as coincident (metres)
pub const RECORDING_EPSILON: f32 = 0.01;

// ============================================================================
// EDITING
// ============================================================================

/// Clearance radius handed to the collision gate (metres)
pub const DEFAULT_CLEARANCE_RADIUS: f32 = 0.25;

/// Default picking radius around a placed waypoint (metres)
pub const DEFAULT_ACCEPTANCE_RADIUS: f32 = 0.3;

/// Legs shorter than this have no horizontal heading of their own
pub const HEADING_EPSILON: f32 = 1e-4;
