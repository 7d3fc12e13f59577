//! Gateway command handlers, driven through the console state machine.

use tabled::Tabled;

use cpgate::HttpBackend;
use cpgate_core::{
    Console, CreateReply, EditableField, Gateway, Notification, NotificationLevel,
};

use crate::cli::{CloneArgs, GatewaysArgs, GatewaysCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct GatewayRow {
    #[tabled(rename = "UID")]
    uid: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    gateway_type: String,
    #[tabled(rename = "IPv4")]
    ipv4: String,
    #[tabled(rename = "IPv6")]
    ipv6: String,
    #[tabled(rename = "Version")]
    version: String,
}

fn gateway_row(g: &Gateway) -> GatewayRow {
    GatewayRow {
        uid: g.uid.clone(),
        name: g.name.clone(),
        gateway_type: g.gateway_type.clone().unwrap_or_default(),
        ipv4: g.ipv4_address.clone().unwrap_or_default(),
        ipv6: g.ipv6_address.clone().unwrap_or_default(),
        version: g.version.clone().unwrap_or_default(),
    }
}

fn or_dash(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("-")
}

fn detail(g: &Gateway) -> String {
    let mut lines = vec![
        format!("UID:        {}", g.uid),
        format!("Name:       {}", g.name),
        format!("Type:       {}", or_dash(g.gateway_type.as_deref())),
        format!("Domain:     {}", or_dash(g.domain.as_deref())),
        format!("IPv4:       {}", or_dash(g.ipv4_address.as_deref())),
        format!("IPv6:       {}", or_dash(g.ipv6_address.as_deref())),
        format!("SIC name:   {}", or_dash(g.sic_name.as_deref())),
        format!("Version:    {}", or_dash(g.version.as_deref())),
        format!("Comments:   {}", or_dash(g.comments.as_deref())),
    ];
    if let Some(ref tags) = g.tags {
        lines.push(format!("Tags:       {}", tags.join(", ")));
    }
    if let Some(ref interfaces) = g.interfaces {
        lines.push("Interfaces:".into());
        for iface in interfaces {
            let mut line = format!("  {}", iface.name);
            if let Some(ref ip) = iface.ipv4_address {
                line.push_str(&format!(" {ip}"));
                if let Some(ref mask) = iface.mask {
                    line.push_str(&format!("/{mask}"));
                }
            }
            if let Some(ref ip) = iface.ipv6_address {
                line.push_str(&format!(" {ip}"));
            }
            if let Some(ref kind) = iface.interface_type {
                line.push_str(&format!(" ({kind})"));
            }
            lines.push(line);
        }
    }
    if let Some(ref props) = g.properties {
        lines.push("Properties:".into());
        for (key, value) in props {
            lines.push(format!("  {key}: {value}"));
        }
    }
    lines.join("\n")
}

fn save_detail(reply: &CreateReply) -> String {
    let mut lines = vec![
        format!("UID:        {}", reply.uid),
        format!("Published:  {}", if reply.published { "yes" } else { "no" }),
    ];
    if let Some(ref err) = reply.publish_error {
        lines.push(format!("Publish:    {err}"));
    }
    lines.join("\n")
}

// ── Console plumbing ────────────────────────────────────────────────

struct ConsoleSession {
    console: Console<HttpBackend>,
    proxy_url: String,
}

impl ConsoleSession {
    /// Log in through the proxy; this also loads the gateway list.
    async fn open(global: &GlobalOpts) -> Result<Self, CliError> {
        let cfg = config::load_config()?;
        let settings = config::console_settings(&cfg, global)?;
        let proxy_url = settings.proxy_url.to_string();

        let backend = HttpBackend::new(settings.proxy_url, settings.timeout).map_err(|e| {
            CliError::ConnectionFailed {
                url: proxy_url.clone(),
                reason: e.to_string(),
            }
        })?;
        let console = Console::new(backend);

        let result = console.login(&settings.api_key, &settings.domain).await;
        report(&console, global.quiet);
        if let Err(err) = result {
            return Err(if console.is_authenticated() {
                CliError::from_console(err, &proxy_url)
            } else {
                CliError::from_login(err, &proxy_url)
            });
        }

        Ok(Self { console, proxy_url })
    }

    fn fail(&self, err: cpgate_core::ConsoleError) -> CliError {
        CliError::from_console(err, &self.proxy_url)
    }
}

/// Warnings and errors go to stderr; the rest is logged.
fn report(console: &Console<HttpBackend>, quiet: bool) {
    for Notification {
        level,
        title,
        message,
    } in console.take_notifications()
    {
        match level {
            NotificationLevel::Warning | NotificationLevel::Error if !quiet => {
                eprintln!("{title}: {message}");
            }
            _ => tracing::info!(%title, %message),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(args: GatewaysArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let session = ConsoleSession::open(global).await?;
    let console = &session.console;

    match args.command {
        GatewaysCommand::List => {
            let gateways = console.gateways();
            let out =
                output::render_list(&global.output, &gateways, gateway_row, |g| g.uid.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GatewaysCommand::Show { uid } => {
            let gateway = console.select(&uid).map_err(|e| session.fail(e))?;
            let out = output::render_single(&global.output, &gateway, detail, |g| g.uid.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        GatewaysCommand::Clone(clone) => {
            let reply = clone_gateway(&session, clone).await;
            report(console, global.quiet);
            let reply = reply?;
            let out = output::render_single(&global.output, &reply, save_detail, |r| r.uid.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

async fn clone_gateway(session: &ConsoleSession, args: CloneArgs) -> Result<CreateReply, CliError> {
    let console = &session.console;
    console.select(&args.uid).map_err(|e| session.fail(e))?;
    console.create_copy().map_err(|e| session.fail(e))?;

    let edits = [
        (EditableField::Name, args.name),
        (EditableField::Comments, args.comments),
        (EditableField::Ipv4Address, args.ipv4),
        (EditableField::Ipv6Address, args.ipv6),
        (EditableField::SicName, args.sic_name),
    ];
    for (field, value) in edits {
        if let Some(value) = value {
            console.edit(field, value).map_err(|e| session.fail(e))?;
        }
    }

    console.save().await.map_err(|e| session.fail(e))
}
