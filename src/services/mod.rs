/// Admin commands driving the contest lifecycle.
pub mod admin_service;
/// Countdown message scheduler.
pub mod countdown;
/// OpenAPI documentation generation.
pub mod documentation;
/// Participant entry submission and lookup.
pub mod entry_service;
/// Health check service.
pub mod health_service;
/// Outbound chat notifications.
pub mod notifier;
/// Startup notice for the announce channel.
pub mod presence;
/// Public service for read-only contest information.
pub mod public_service;
