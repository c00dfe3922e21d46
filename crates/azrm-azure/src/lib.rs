//! # azrm – Azure resource-management commands
//!
//! Scriptable commands over the Azure Resource Manager (ARM) REST API.
//!
//! ## Features
//!
//! - **OAuth2 Authentication** – client-credentials flow, per-tenant tokens
//! - **Virtual Networks** – update by object or by name, get/list, add subnets locally or remotely
//! - **Subscriptions** – lookup by name or id, list per tenant
//! - **Recovery Services** – get/list vaults, remove a vault
//!
//! Commands take an invocation-mode enum plus a resource-client trait
//! object (`resource_client`), and map between presentation models
//! (`models`) and ARM wire shapes (`wire`) through `mapper`.

pub mod types;
pub mod client;
pub mod auth;
pub mod wire;
pub mod models;
pub mod mapper;
pub mod resource_client;
pub mod networking;
pub mod subscriptions;
pub mod recovery_services;
pub mod commands;
pub mod service;
