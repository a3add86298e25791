//! Unit tests for fb-protocol.

#[cfg(test)]
mod helpers {
    use serde_json::Value;

    use crate::{encode, Message};

    /// Encode `message` and reparse it as an untyped JSON value.
    pub fn to_value(message: &Message) -> Value {
        serde_json::from_slice(&encode(message).unwrap()).unwrap()
    }
}

// ── Messages ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod message {
    use std::collections::BTreeMap;

    use serde_json::json;

    use fb_core::{LinkId, RequestId, VehicleId};
    use crate::{
        decode, IterationMessage, IterationVehicle, Message, ProtocolError, StateMessage,
        SubmittedRequest, TravelTimeResponse, VehicleState, VehicleStatus,
    };
    use super::helpers::to_value;

    #[test]
    fn unit_messages_carry_only_the_tag() {
        assert_eq!(to_value(&Message::Finalization), json!({ "@message": "finalization" }));
        assert_eq!(decode(br#"{"@message":"initialization"}"#).unwrap(), Message::Initialization);
    }

    #[test]
    fn iteration_layout() {
        let msg = Message::Iteration(IterationMessage {
            iteration: 0,
            vehicles:  vec![IterationVehicle { id: VehicleId(3), start_link: LinkId(8), capacity: 4 }],
        });
        assert_eq!(
            to_value(&msg),
            json!({
                "@message": "iteration",
                "iteration": 0,
                "vehicles": [{ "id": "3", "startLink": "8", "capacity": 4 }]
            })
        );
    }

    #[test]
    fn state_writes_unbounded_times_as_null() {
        let msg = Message::State(StateMessage {
            time:        30.0,
            picked_up:   BTreeMap::from([(RequestId(1), VehicleId(2))]),
            dropped_off: BTreeMap::new(),
            vehicles:    vec![VehicleState {
                id:                VehicleId(2),
                current_link:      LinkId(5),
                current_exit_time: f64::INFINITY,
                diverge_link:      LinkId(5),
                diverge_time:      30.0,
                state:             VehicleStatus::Stay,
            }],
            submitted:   vec![SubmittedRequest {
                id:                   RequestId(4),
                origin_link:          LinkId(1),
                destination_link:     LinkId(2),
                earliest_pickup_time: 30.0,
                latest_pickup_time:   f64::INFINITY,
                latest_arrival_time:  900.0,
                size:                 1,
            }],
        });
        let v = to_value(&msg);
        assert_eq!(v["@message"], "state");
        assert_eq!(v["pickedUp"], json!({ "1": "2" }));
        assert_eq!(v["vehicles"][0]["currentExitTime"], json!(null));
        assert_eq!(v["vehicles"][0]["divergeTime"], json!(30.0));
        assert_eq!(v["vehicles"][0]["state"], "stay");
        assert_eq!(v["submitted"][0]["latestPickupTime"], json!(null));
        assert_eq!(v["submitted"][0]["latestArrivalTime"], json!(900.0));
    }

    #[test]
    fn state_round_trips_infinity() {
        let raw = br#"{"@message":"state","time":5,"vehicles":[
            {"id":"1","currentLink":"2","currentExitTime":null,
             "divergeLink":"2","divergeTime":5,"state":"drive"}]}"#;
        let Message::State(state) = decode(raw).unwrap() else { panic!("expected state") };
        assert_eq!(state.vehicles[0].current_exit_time, f64::INFINITY);
        assert_eq!(state.vehicles[0].state, VehicleStatus::Drive);
        assert!(state.submitted.is_empty());
    }

    #[test]
    fn assignment_defaults() {
        let raw = br#"{"@message":"assignment","waitFor":2.5,
            "stops":{"1":[{"link":"5","pickup":["9"],"stopDuration":60,"id":"s-1"}]}}"#;
        let Message::Assignment(a) = decode(raw).unwrap() else { panic!("expected assignment") };
        assert!(a.rejections.is_empty());
        let stop = &a.stops[&VehicleId(1)][0];
        assert_eq!(stop.link, LinkId(5));
        assert_eq!(stop.pickup, vec![RequestId(9)]);
        assert!(stop.dropoff.is_empty());
        assert!(stop.route.is_none());
        assert_eq!(stop.earliest_start_time, f64::NEG_INFINITY);
        assert_eq!(stop.stop_duration, 60.0);
        assert!(stop.has_passengers());
    }

    #[test]
    fn assignment_null_earliest_start_and_route() {
        let raw = br#"{"@message":"assignment","stops":{"1":[
            {"link":"5","earliestStartTime":null,"route":["3","4","5"]}]},"rejections":["7"]}"#;
        let Message::Assignment(a) = decode(raw).unwrap() else { panic!("expected assignment") };
        let stop = &a.stops[&VehicleId(1)][0];
        assert_eq!(stop.earliest_start_time, f64::NEG_INFINITY);
        assert_eq!(stop.route.as_deref(), Some(&[LinkId(3), LinkId(4), LinkId(5)][..]));
        assert!(!stop.has_passengers());
        assert_eq!(a.rejections, vec![RequestId(7)]);
    }

    #[test]
    fn query_accepts_integer_ids_and_missing_links() {
        let Message::TravelTimeQuery(q) = decode(br#"{"@message":"travel_time_query","links":[1,"2"]}"#).unwrap()
        else {
            panic!("expected query")
        };
        assert_eq!(q.links, vec![LinkId(1), LinkId(2)]);

        let Message::TravelTimeQuery(q) = decode(br#"{"@message":"travel_time_query"}"#).unwrap() else {
            panic!("expected query")
        };
        assert!(q.links.is_empty());
    }

    #[test]
    fn response_layout() {
        let msg = Message::TravelTimeResponse(TravelTimeResponse {
            travel_times: BTreeMap::from([(LinkId(0), 10.0), (LinkId(4), 2.5)]),
        });
        assert_eq!(
            to_value(&msg),
            json!({ "@message": "travel_time_response", "travelTimes": { "0": 10.0, "4": 2.5 } })
        );
    }

    #[test]
    fn rejects_unknown_tag_and_garbage() {
        assert!(matches!(decode(br#"{"@message":"hello"}"#), Err(ProtocolError::Malformed(_))));
        assert!(matches!(decode(br#"{"links":[]}"#), Err(ProtocolError::Malformed(_))));
        assert!(matches!(decode(b"not json"), Err(ProtocolError::Malformed(_))));
    }

    #[test]
    fn rejects_bad_ids() {
        let raw = br#"{"@message":"travel_time_query","links":["veh_1"]}"#;
        assert!(matches!(decode(raw), Err(ProtocolError::Malformed(_))));
    }

    #[test]
    fn tag_names_match_wire() {
        assert_eq!(Message::Initialization.tag(), "initialization");
        assert_eq!(Message::TravelTimeResponse(Default::default()).tag(), "travel_time_response");
    }
}

// ── Framing ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod framing {
    use std::io::Cursor;
    use std::thread;

    use crate::{connect, FramedListener, FramedStream, ProtocolError, Transport};

    #[test]
    fn frames_round_trip_through_a_buffer() {
        let mut out = FramedStream::new(Cursor::new(Vec::new()), 1024);
        out.send(b"hello").unwrap();
        out.send(b"").unwrap();

        let bytes = out.into_inner().into_inner();
        assert_eq!(&bytes[..4], &[0, 0, 0, 5]);

        let mut input = FramedStream::new(Cursor::new(bytes), 1024);
        assert_eq!(input.recv().unwrap(), b"hello");
        assert_eq!(input.recv().unwrap(), b"");
        assert!(matches!(input.recv(), Err(ProtocolError::ConnectionClosed)));
    }

    #[test]
    fn oversized_frames_are_rejected() {
        let mut out = FramedStream::new(Cursor::new(Vec::new()), 4);
        assert!(matches!(out.send(b"too long"), Err(ProtocolError::FrameTooLarge { len: 8, max: 4 })));

        let mut bytes = 100_u32.to_be_bytes().to_vec();
        bytes.extend_from_slice(&[0; 100]);
        let mut input = FramedStream::new(Cursor::new(bytes), 10);
        assert!(matches!(input.recv(), Err(ProtocolError::FrameTooLarge { len: 100, max: 10 })));
    }

    #[test]
    fn truncated_payload_is_a_closed_connection() {
        let mut bytes = 10_u32.to_be_bytes().to_vec();
        bytes.extend_from_slice(b"abc");
        let mut input = FramedStream::new(Cursor::new(bytes), 1024);
        assert!(matches!(input.recv(), Err(ProtocolError::ConnectionClosed)));
    }

    #[test]
    fn tcp_round_trip() {
        let listener = FramedListener::bind("127.0.0.1:0", 1024).unwrap();
        let addr = listener.local_addr().unwrap();

        let peer = thread::spawn(move || {
            let mut conn = connect(addr, 1024).unwrap();
            conn.send(b"ping").unwrap();
            conn.recv().unwrap()
        });

        let mut server = listener.accept().unwrap();
        assert_eq!(server.recv().unwrap(), b"ping");
        server.send(b"pong").unwrap();
        assert_eq!(peer.join().unwrap(), b"pong");
    }
}
