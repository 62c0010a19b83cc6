//! Tests for turning raw forms into normalized forms.
