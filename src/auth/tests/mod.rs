//! Tests for the authentication flow, driven through fake window and opener
//! doubles so no real browser window is ever needed.
