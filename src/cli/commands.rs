use std::io::{self, Write};

use channelctl::{
    find_by_id, Channel, ConfigStore, EntityKind, NewChannel, NewSite, NewSource, Result, Site,
    SiteType, Source,
};

use super::args::{ChannelAction, Commands, SiteAction, SourceAction};

pub fn dispatch(store: &ConfigStore, command: Commands) -> Result<()> {
    match command {
        Commands::Channel { action } => channel_command(store, action),
        Commands::Source { action } => source_command(store, action),
        Commands::Site { action } => site_command(store, action),
    }
}

fn channel_command(store: &ConfigStore, action: ChannelAction) -> Result<()> {
    match action {
        ChannelAction::List { json } => {
            let channels = store.list_channels()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&channels)?);
            } else {
                print_channels(&channels);
            }
        }
        ChannelAction::Add {
            name,
            url,
            post_times,
            forbidden,
        } => {
            let id = store.create_channel(NewChannel {
                name,
                url,
                post_times: split_list(&post_times),
                forbidden_words: split_list(&forbidden),
            })?;
            println!("created channel {id}");
        }
        ChannelAction::Edit {
            id,
            name,
            url,
            post_times,
            forbidden,
        } => {
            store.update_channel(
                id,
                NewChannel {
                    name,
                    url,
                    post_times: split_list(&post_times),
                    forbidden_words: split_list(&forbidden),
                },
            )?;
            println!("updated channel {id}");
        }
        ChannelAction::Rm { id, force } => {
            let channels = store.list_channels()?;
            let sources = store.list_sources()?;
            let sites = store.list_sites()?;
            let owned: Vec<i64> = sources
                .iter()
                .filter(|s| s.channel_id == id)
                .map(|s| s.id)
                .collect();
            let site_count = sites.iter().filter(|s| owned.contains(&s.parent_id)).count();

            let label = match find_by_id(&channels, id) {
                Some(channel) => format!("channel '{}' (id {id})", channel.name),
                None => format!("channel {id}"),
            };
            let prompt = format!(
                "Delete {label}? This also removes {} source(s) and {} site(s).",
                owned.len(),
                site_count
            );
            if force || confirm(&prompt)? {
                store.delete(EntityKind::Channel, id)?;
                println!("deleted channel {id}");
            }
        }
    }
    Ok(())
}

fn source_command(store: &ConfigStore, action: SourceAction) -> Result<()> {
    match action {
        SourceAction::List { json } => {
            let sources = store.list_sources()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&sources)?);
            } else {
                print_sources(&sources);
            }
        }
        SourceAction::Add {
            channel,
            url,
            parse_media,
            forbidden,
        } => {
            let id = store.create_source(NewSource {
                channel_id: channel,
                source_url: url,
                parse_media,
                forbidden_words: split_list(&forbidden),
            })?;
            println!("created source {id}");
        }
        SourceAction::Edit {
            id,
            channel,
            url,
            parse_media,
            forbidden,
        } => {
            store.update_source(
                id,
                NewSource {
                    channel_id: channel,
                    source_url: url,
                    parse_media,
                    forbidden_words: split_list(&forbidden),
                },
            )?;
            println!("updated source {id}");
        }
        SourceAction::Rm { id, force } => {
            let sources = store.list_sources()?;
            let sites = store.list_sites()?;
            let site_count = sites.iter().filter(|s| s.parent_id == id).count();

            let label = match find_by_id(&sources, id) {
                Some(source) => format!("source '{}' (id {id})", source.source_url),
                None => format!("source {id}"),
            };
            let prompt = format!("Delete {label}? This also removes {site_count} site(s).");
            if force || confirm(&prompt)? {
                store.delete(EntityKind::Source, id)?;
                println!("deleted source {id}");
            }
        }
    }
    Ok(())
}

fn site_command(store: &ConfigStore, action: SiteAction) -> Result<()> {
    match action {
        SiteAction::List { json } => {
            let sites = store.list_sites()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&sites)?);
            } else {
                print_sites(&sites);
            }
        }
        SiteAction::Add {
            source,
            url,
            site_type,
        } => {
            let id = store.create_site(NewSite {
                parent_id: source,
                site_url: url,
                site_type: parse_site_type(&site_type)?,
            })?;
            println!("created site {id}");
        }
        SiteAction::Edit {
            id,
            source,
            url,
            site_type,
        } => {
            store.update_site(
                id,
                NewSite {
                    parent_id: source,
                    site_url: url,
                    site_type: parse_site_type(&site_type)?,
                },
            )?;
            println!("updated site {id}");
        }
        SiteAction::Rm { id, force } => {
            if force || confirm(&format!("Delete site {id}?"))? {
                store.delete(EntityKind::Site, id)?;
                println!("deleted site {id}");
            }
        }
    }
    Ok(())
}

fn parse_site_type(raw: &str) -> Result<SiteType> {
    raw.trim().to_uppercase().parse()
}

// Comma-separated operator input becomes a list value before it reaches
// the store; the store never parses delimited text itself.
fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

fn print_channels(channels: &[Channel]) {
    println!(
        "{:<6} {:<20} {:<32} {:<20} {}",
        "ID", "NAME", "URL", "POST TIMES", "FORBIDDEN WORDS"
    );
    for channel in channels {
        println!(
            "{:<6} {:<20} {:<32} {:<20} {}",
            channel.id,
            channel.name,
            channel.url,
            channel.post_times.join(","),
            channel.forbidden_words.join(",")
        );
    }
}

fn print_sources(sources: &[Source]) {
    println!(
        "{:<6} {:<10} {:<40} {:<8} {}",
        "ID", "CHANNEL", "URL", "MEDIA", "FORBIDDEN WORDS"
    );
    for source in sources {
        println!(
            "{:<6} {:<10} {:<40} {:<8} {}",
            source.id,
            source.channel_id,
            source.source_url,
            if source.parse_media { "yes" } else { "no" },
            source.forbidden_words.join(",")
        );
    }
}

fn print_sites(sites: &[Site]) {
    println!("{:<6} {:<10} {:<40} {}", "ID", "SOURCE", "URL", "TYPE");
    for site in sites {
        println!(
            "{:<6} {:<10} {:<40} {}",
            site.id, site.parent_id, site.site_url, site.site_type
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_list_trims_and_drops_empties() {
        assert_eq!(split_list("09:00, 18:00"), vec!["09:00", "18:00"]);
        assert_eq!(split_list(" spam ,, ads "), vec!["spam", "ads"]);
        assert!(split_list("").is_empty());
        assert!(split_list(" , ").is_empty());
    }

    #[test]
    fn site_type_input_is_case_insensitive() {
        assert_eq!(parse_site_type("rent").unwrap(), SiteType::Rent);
        assert_eq!(parse_site_type(" AUTO ").unwrap(), SiteType::Auto);
        assert!(parse_site_type("lease").is_err());
    }
}
