//! Scene-level picking scenarios
