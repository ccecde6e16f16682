use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "channelctl")]
#[command(about = "Manage content-distribution channels, their sources and sites")]
#[command(version)]
pub struct Cli {
    /// Database path (overrides the configured default)
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage output channels
    Channel {
        #[command(subcommand)]
        action: ChannelAction,
    },

    /// Manage scrape sources
    Source {
        #[command(subcommand)]
        action: SourceAction,
    },

    /// Manage pollable sites
    Site {
        #[command(subcommand)]
        action: SiteAction,
    },
}

#[derive(Subcommand)]
pub enum ChannelAction {
    /// List all channels
    List {
        /// Print as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Create a channel
    Add {
        /// Unique channel name
        #[arg(long)]
        name: String,

        /// Unique destination URL
        #[arg(long)]
        url: String,

        /// Posting times, comma separated (e.g. "09:00,18:00")
        #[arg(long, default_value = "")]
        post_times: String,

        /// Forbidden words, comma separated
        #[arg(long, default_value = "")]
        forbidden: String,
    },

    /// Replace a channel record (full replace, all fields)
    Edit {
        id: i64,

        #[arg(long)]
        name: String,

        #[arg(long)]
        url: String,

        #[arg(long, default_value = "")]
        post_times: String,

        #[arg(long, default_value = "")]
        forbidden: String,
    },

    /// Delete a channel; its sources and their sites go with it
    Rm {
        id: i64,

        /// Skip the confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum SourceAction {
    /// List all sources
    List {
        #[arg(long)]
        json: bool,
    },

    /// Create a source under a channel
    Add {
        /// Id of the owning channel
        #[arg(long)]
        channel: i64,

        /// URL to scrape
        #[arg(long)]
        url: String,

        /// Also pull media attachments
        #[arg(long)]
        parse_media: bool,

        /// Forbidden words, comma separated
        #[arg(long, default_value = "")]
        forbidden: String,
    },

    /// Replace a source record (full replace, all fields)
    Edit {
        id: i64,

        #[arg(long)]
        channel: i64,

        #[arg(long)]
        url: String,

        #[arg(long)]
        parse_media: bool,

        #[arg(long, default_value = "")]
        forbidden: String,
    },

    /// Delete a source; its sites go with it
    Rm {
        id: i64,

        #[arg(long)]
        force: bool,
    },
}

#[derive(Subcommand)]
pub enum SiteAction {
    /// List all sites
    List {
        #[arg(long)]
        json: bool,
    },

    /// Create a site under a source
    Add {
        /// Id of the owning source
        #[arg(long)]
        source: i64,

        /// URL to poll
        #[arg(long)]
        url: String,

        /// Listing category: AUTO, RENT, BUY or FREE
        #[arg(long = "type")]
        site_type: String,
    },

    /// Replace a site record (full replace, all fields)
    Edit {
        id: i64,

        #[arg(long)]
        source: i64,

        #[arg(long)]
        url: String,

        #[arg(long = "type")]
        site_type: String,
    },

    /// Delete a site
    Rm {
        id: i64,

        #[arg(long)]
        force: bool,
    },
}
