mod determinism;
mod event_stream;
mod membership;
mod scheduling;
mod sweep;
