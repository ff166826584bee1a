//! Integration tests driving `PostMessageApi` with raw window messages.

mod sequences;
