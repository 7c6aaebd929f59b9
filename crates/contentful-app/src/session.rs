//! One host session: handshake, mount the form, then route host lines to it
//! until the host closes its end.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncWrite};

use contentful_api::OptionsSource;
use contentful_core::config::{ConfigSource, FetchSettings};
use contentful_runtime::host::{HostLines, InboundMessage, OutboundMessage};
use contentful_runtime::{FormHandle, StdioHost};

use crate::error::AppError;

pub async fn run<S, R, W>(
    source: ConfigSource,
    settings: &FetchSettings,
    options: Arc<S>,
    reader: R,
    writer: W,
) -> Result<(), AppError>
where
    S: OptionsSource + 'static,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin + Send + 'static,
{
    let mut lines = HostLines::new(reader);
    let host = Arc::new(StdioHost::connect(source, &mut lines, writer).await?);
    let form = FormHandle::mount(host.clone(), options, settings);

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        let msg = match InboundMessage::parse(&line) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::warn!(error = %e, "Ignoring malformed host line");
                continue;
            }
        };

        match msg {
            InboundMessage::Init { .. } => {
                tracing::warn!("Ignoring host handshake after startup");
            }
            InboundMessage::RequestConfigUpdate { id } => {
                // Edits read earlier on this stream must land before the reply.
                form.view().await?;
                host.answer_config_request(id);
            }
            InboundMessage::ApiKey { value } => form.edit_api_key(value)?,
            InboundMessage::SpaceId { value } => form.edit_space_id(value)?,
            InboundMessage::MapName { value } => form.select_map_name(value)?,
            InboundMessage::PlaylistId { value } => form.select_playlist_id(value)?,
            InboundMessage::View => {
                let view = form.view().await?;
                host.send(OutboundMessage::View { view });
            }
        }
    }

    tracing::info!("Host closed its input, shutting down");
    drop(form);
    host.flush().await?;
    Ok(())
}
