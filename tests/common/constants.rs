//! Shared constants for end-to-end tests
//!
//! When the seeded catalog changes (ids, names, durations), update only
//! this file.

// ============================================================================
// Seeded Catalog IDs
// ============================================================================

/// Artist id for "the test band"
pub const ARTIST_1_ID: &str = "00000000000000000000a001";

/// Artist id for "jazz ensemble"
pub const ARTIST_2_ID: &str = "00000000000000000000a002";

/// Genre id for "Rock"
pub const GENRE_ROCK_ID: &str = "00000000000000000000b001";

/// Genre id for "Jazz"
pub const GENRE_JAZZ_ID: &str = "00000000000000000000b002";

/// Song id for "Opening Track" (180s, 2019, rock)
pub const SONG_1_ID: &str = "00000000000000000000c001";

/// Song id for "Middle Track" (210s, 2020, rock)
pub const SONG_2_ID: &str = "00000000000000000000c002";

/// Song id for "Smooth Jazz" (240s, 2021, jazz)
pub const SONG_3_ID: &str = "00000000000000000000c003";

/// Playlist id for "Road Trip" (seeded empty)
pub const PLAYLIST_1_ID: &str = "00000000000000000000d001";

/// A well-formed id that matches nothing in the seeded catalog
pub const MISSING_ID: &str = "ffffffffffffffffffffffff";

// ============================================================================
// Seeded Catalog Metadata
// ============================================================================

/// Artist 1 canonical (stored) name
pub const ARTIST_1_NAME: &str = "the test band";

/// Artist 1 wire (display) name
pub const ARTIST_1_DISPLAY_NAME: &str = "The Test Band";

/// Artist 2 canonical (stored) name
pub const ARTIST_2_NAME: &str = "jazz ensemble";

/// Song 1 title
pub const SONG_1_TITLE: &str = "Opening Track";

/// Song 2 title
pub const SONG_2_TITLE: &str = "Middle Track";

/// Song 3 title
pub const SONG_3_TITLE: &str = "Smooth Jazz";

// ============================================================================
// Test Timeouts and Configuration
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
