//! `canbridge` library: primitives and protocol logic required to bridge a
//! vehicle's proprietary CAN bus to typed state accessors and actuation
//! sequences in a `no_std` environment. The crate exposes the infrastructure
//! modules (SPSC frame transport, hex console codec), the protocol logic
//! (frame codec, command sequencer, gesture recognizer), and the gateway
//! that drives them from a cooperative tick loop.
#![no_std]
//==================================================================================
/// Compile-time configuration: timing windows, queue depths, button masks.
pub mod config;
/// Domain and low-level errors (control requests, console line parsing).
pub mod error;
/// Infrastructure shared between interrupt and application context
/// (lock-free frame transport, hex-line codec).
pub mod infra;
/// Protocol implementation: CAN transport types, the frame codec and its
/// owned state snapshots, command sequencing, and gesture recognition.
pub mod protocol;
//==================================================================================
/// Gateway assembling the protocol components behind one tick-driven API.
pub mod gateway;
