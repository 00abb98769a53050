// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::time::Duration;

use crate::listener::handle_connection;
use crate::listener::tests::{harness, Harness};
use crate::protocol::{self, Request, Response, DEFAULT_TIMEOUT};
use mcb_core::test_support::bot_record;
use mcb_core::{BotEvent, BotId};
use tokio::net::UnixStream;

#[tokio::test]
async fn subscriber_receives_events_until_hangup() {
    let Harness {
        ctx,
        adapter,
        mut event_rx,
        ..
    } = harness([bot_record("bot-1")]);
    let bot_id = BotId::new("bot-1");
    let (server, client) = UnixStream::pair().unwrap();
    let (mut client_rx, mut client_tx) = client.into_split();

    let serve = handle_connection(server, &ctx);
    let drive = async {
        protocol::write_request(
            &mut client_tx,
            &Request::Subscribe {
                bot_id: bot_id.clone(),
            },
            DEFAULT_TIMEOUT,
        )
        .await
        .unwrap();
        let ack = protocol::read_response(&mut client_rx, DEFAULT_TIMEOUT)
            .await
            .unwrap();
        assert_eq!(
            ack,
            Response::Subscribed {
                bot_id: bot_id.clone()
            }
        );

        let started = ctx.manager.start(&bot_id).await;
        assert!(started.success);
        adapter.emit_connected("bot-1").await;
        while let Ok(event) = event_rx.try_recv() {
            ctx.manager.handle_event(event).await;
        }

        let frame = protocol::read_response(&mut client_rx, DEFAULT_TIMEOUT)
            .await
            .unwrap();
        assert!(
            matches!(&frame, Response::Event { event: BotEvent::Connected { bot_id: id, .. } } if *id == bot_id),
            "unexpected frame: {frame:?}"
        );

        // Hanging up ends the stream on the server side
        drop(client_tx);
        drop(client_rx);
    };

    let (served, ()) = tokio::time::timeout(Duration::from_secs(5), async {
        tokio::join!(serve, drive)
    })
    .await
    .unwrap();
    served.unwrap();
    assert_eq!(ctx.manager.relay_rooms(), 0);
}

#[tokio::test]
async fn subscriber_only_sees_its_own_bot() {
    let Harness {
        ctx,
        adapter,
        mut event_rx,
        ..
    } = harness([bot_record("bot-1"), bot_record("bot-2")]);
    let watched = BotId::new("bot-2");
    let (server, client) = UnixStream::pair().unwrap();
    let (mut client_rx, mut client_tx) = client.into_split();

    let serve = handle_connection(server, &ctx);
    let drive = async {
        protocol::write_request(
            &mut client_tx,
            &Request::Subscribe {
                bot_id: watched.clone(),
            },
            DEFAULT_TIMEOUT,
        )
        .await
        .unwrap();
        protocol::read_response(&mut client_rx, DEFAULT_TIMEOUT)
            .await
            .unwrap();

        ctx.manager.start(&BotId::new("bot-1")).await;
        ctx.manager.start(&watched).await;
        adapter.emit_connected("bot-1").await;
        adapter.emit_connected("bot-2").await;
        while let Ok(event) = event_rx.try_recv() {
            ctx.manager.handle_event(event).await;
        }

        let frame = protocol::read_response(&mut client_rx, DEFAULT_TIMEOUT)
            .await
            .unwrap();
        let Response::Event { event } = frame else {
            panic!("expected Event, got {frame:?}");
        };
        assert_eq!(event.bot_id(), &watched);

        drop(client_tx);
        drop(client_rx);
    };

    let (served, ()) = tokio::time::timeout(Duration::from_secs(5), async {
        tokio::join!(serve, drive)
    })
    .await
    .unwrap();
    served.unwrap();
}
