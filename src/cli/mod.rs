//! CLI module for PanZoom
//!
//! This module handles command-line argument parsing and command execution.

use clap::{Parser, Subcommand};

use crate::utils::logging::LogFormat;

pub mod args;
pub mod commands;
pub mod report;

/// PanZoom slideshow generator
///
/// Turns a folder of photos and an audio track into a Ken Burns style video,
/// rendered by ffmpeg.
#[derive(Parser, Debug)]
#[command(name = "panzoom")]
#[command(about = "PanZoom - Ken Burns slideshows from photos and music")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level or filter directive
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Log output format (pretty, compact, json)
    #[arg(long, default_value = "pretty", global = true)]
    pub log_format: LogFormat,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a slideshow video
    Video(args::VideoArgs),
    /// List style presets
    Presets,
    /// List transitions
    Transitions,
    /// List export profiles
    Exports,
    /// Write a default config file
    Init(args::InitArgs),
}
