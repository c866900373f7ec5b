//! # Integration Tests
//!
//! Integration tests and end-to-end tests.
//!
//! Responsibilities:
//! - Contract snapshot tests
//! - Concrete end-to-end synchronization scenarios
//! - Simulated e2e tests (no real BLE hardware required)

#[cfg(test)]
mod contract_tests {
    #[test]
    fn test_contracts_compile() {
        // Verify contracts crate can compile
        let _ = contracts::ConfigVersion::V1;
    }
}

/// Concrete end-to-end scenarios exercising the synchronization core through
/// its public `Pipeline` API with hand-picked timestamps.
#[cfg(test)]
mod scenarios {
    use contracts::{
        ActiveJoint, JointSide, Quaternion, SensorId, SensorPlacement, SensorSlot, SyncCoreConfig,
    };
    use sync_engine::Pipeline;

    fn identity() -> Quaternion {
        Quaternion::IDENTITY
    }

    fn q(deg: f64) -> Quaternion {
        let half = deg.to_radians() / 2.0;
        Quaternion::new(half.cos(), 0.0, 0.0, half.sin())
    }

    fn both_joints_config(output_hz: u32, drain_per_tick_limit: usize) -> SyncCoreConfig {
        SyncCoreConfig {
            output_hz,
            buffer_capacity: Some(100),
            drain_per_tick_limit,
            sensor_map: vec![
                SensorSlot {
                    sensor_id: SensorId::new(0),
                    side: JointSide::Left,
                    placement: SensorPlacement::Thigh,
                },
                SensorSlot {
                    sensor_id: SensorId::new(1),
                    side: JointSide::Left,
                    placement: SensorPlacement::Shin,
                },
                SensorSlot {
                    sensor_id: SensorId::new(2),
                    side: JointSide::Right,
                    placement: SensorPlacement::Thigh,
                },
                SensorSlot {
                    sensor_id: SensorId::new(3),
                    side: JointSide::Right,
                    placement: SensorPlacement::Shin,
                },
            ],
        }
    }

    fn left_only_config(output_hz: u32, drain_per_tick_limit: usize) -> SyncCoreConfig {
        SyncCoreConfig {
            output_hz,
            buffer_capacity: Some(100),
            drain_per_tick_limit,
            sensor_map: vec![
                SensorSlot {
                    sensor_id: SensorId::new(0),
                    side: JointSide::Left,
                    placement: SensorPlacement::Thigh,
                },
                SensorSlot {
                    sensor_id: SensorId::new(1),
                    side: JointSide::Left,
                    placement: SensorPlacement::Shin,
                },
            ],
        }
    }

    /// S1 — steady state, both joints. Uniform 10ms arrivals on all four
    /// sensors produce one emission per tick on the 10ms grid.
    #[test]
    fn s1_steady_state_both_joints() {
        let pipeline = Pipeline::new(both_joints_config(100, 20));
        let mut emitted = Vec::new();

        for t in [0, 10, 20, 30, 40] {
            for id in 0..4u8 {
                pipeline.push_sample(SensorId::new(id), t, identity());
            }
            emitted.extend(pipeline.tick());
        }

        assert_eq!(emitted.len(), 4);
        assert_eq!(
            emitted.iter().map(|f| f.timestamp).collect::<Vec<_>>(),
            vec![10, 20, 30, 40]
        );
        for frame in &emitted {
            assert!(frame.left_knee.is_some());
            assert!(frame.right_knee.is_some());
            let left_thigh = frame.left_knee.as_ref().unwrap().thigh.unwrap();
            assert!((left_thigh.quaternion.w - 1.0).abs() < 1e-9);
        }
    }

    /// S2 — single-joint operation. Only the left sensors are configured;
    /// the right knee never appears in any emitted frame.
    #[test]
    fn s2_single_joint_operation() {
        let pipeline = Pipeline::new(left_only_config(100, 20));
        assert!(pipeline.is_single_joint_mode());

        let mut emitted = Vec::new();
        for t in (0..=100).step_by(10) {
            pipeline.push_sample(SensorId::new(0), t, identity());
            pipeline.push_sample(SensorId::new(1), t, identity());
            emitted.extend(pipeline.tick());
        }

        assert_eq!(emitted.len(), 10);
        assert_eq!(pipeline.active_joint(), ActiveJoint::Left);
        for frame in &emitted {
            assert!(frame.left_knee.is_some());
            assert!(frame.right_knee.is_none());
        }
    }

    /// S3 — jitter absorption. Thigh and shin arrive on independent jittery
    /// schedules; every emitted timestamp still lands on the 10ms grid and
    /// the sequence is strictly monotonic.
    #[test]
    fn s3_jitter_absorption() {
        let pipeline = Pipeline::new(left_only_config(100, 20));
        let thigh_ts = [0, 8, 23, 27, 35];
        let shin_ts = [2, 13, 17, 29, 34];

        let mut events: Vec<(SensorId, i64)> = thigh_ts
            .iter()
            .map(|t| (SensorId::new(0), *t))
            .chain(shin_ts.iter().map(|t| (SensorId::new(1), *t)))
            .collect();
        events.sort_by_key(|(_, t)| *t);

        let mut emitted = Vec::new();
        for (sensor_id, ts) in events {
            pipeline.push_sample(sensor_id, ts, identity());
            emitted.extend(pipeline.tick());
        }

        let mut last: Option<i64> = None;
        for frame in &emitted {
            assert_eq!(frame.timestamp % 10, 0);
            if let Some(prev) = last {
                assert!(frame.timestamp > prev);
            }
            last = Some(frame.timestamp);
        }
    }

    /// S4 — gap then catch-up. A 200ms silence followed by a burst must
    /// drain at most `drain_per_tick_limit` grid points per tick, in order.
    #[test]
    fn s4_gap_then_catch_up() {
        let pipeline = Pipeline::new(left_only_config(100, 5));

        for t in (0..=50).step_by(10) {
            pipeline.push_sample(SensorId::new(0), t, identity());
            pipeline.push_sample(SensorId::new(1), t, identity());
            pipeline.tick();
        }

        // Silence for 200ms, then a single burst arrival at t=260.
        pipeline.push_sample(SensorId::new(0), 260, identity());
        pipeline.push_sample(SensorId::new(1), 260, identity());
        let first_catch_up = pipeline.tick();

        assert_eq!(first_catch_up.len(), 5);
        assert_eq!(
            first_catch_up.iter().map(|f| f.timestamp).collect::<Vec<_>>(),
            vec![60, 70, 80, 90, 100]
        );

        let second_catch_up = pipeline.tick();
        assert_eq!(second_catch_up.len(), 5);
        assert_eq!(second_catch_up[0].timestamp, 110);

        let mut last = second_catch_up.last().unwrap().timestamp;
        loop {
            let batch = pipeline.tick();
            if batch.is_empty() {
                break;
            }
            for frame in &batch {
                assert!(frame.timestamp > last);
                last = frame.timestamp;
            }
        }
        assert!(last <= 260);
    }

    /// S5 — out-of-order push. A late sample still lands in its correct
    /// slot and the newest-timestamp bookkeeping reflects the in-order one.
    #[test]
    fn s5_out_of_order_push() {
        let pipeline = Pipeline::new(left_only_config(100, 20));
        pipeline.push_sample(SensorId::new(0), 10, identity());
        pipeline.push_sample(SensorId::new(0), 5, identity());

        let stats = pipeline.debug_stats();
        let thigh = stats
            .per_sensor
            .iter()
            .find(|s| s.sensor_id == SensorId::new(0))
            .unwrap();
        assert_eq!(thigh.out_of_order_count, 1);
        assert_eq!(thigh.newest_ts, Some(10));
        assert_eq!(thigh.buffer_len, 2);
    }

    /// S6 — shortest-arc interpolation. A thigh rotation jumping from +179°
    /// to -179° must interpolate through the 180° pole, not back through 0°.
    #[test]
    fn s6_shortest_arc_interpolation() {
        let config = SyncCoreConfig {
            output_hz: 200,
            buffer_capacity: Some(100),
            drain_per_tick_limit: 20,
            sensor_map: vec![SensorSlot {
                sensor_id: SensorId::new(0),
                side: JointSide::Left,
                placement: SensorPlacement::Thigh,
            }],
        };
        let pipeline = Pipeline::new(config);

        pipeline.push_sample(SensorId::new(0), 0, q(179.0));
        pipeline.tick();
        pipeline.push_sample(SensorId::new(0), 10, q(-179.0));
        let emitted = pipeline.tick();

        assert_eq!(emitted[0].timestamp, 5);
        let midpoint = emitted[0].left_knee.as_ref().unwrap().thigh.unwrap();
        // Near +/-180 degrees: w close to 0, not close to 1 (identity).
        assert!(midpoint.quaternion.w.abs() < 0.1);
    }
}

#[cfg(test)]
mod e2e_tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    use contracts::{
        AlignedSampleSet, JointSide, SensorId, SensorPlacement, SensorSlot, SinkConfig, SinkType,
        SyncCoreConfig,
    };
    use dispatcher::create_dispatcher;
    use ingestion::{IngestionPipeline, MockImuSource};
    use sync_engine::Pipeline;
    use tokio::sync::mpsc;

    /// End-to-end test: MockImuSource -> IngestionPipeline -> sync core -> Dispatcher.
    ///
    /// Verifies complete data flow:
    /// 1. Mock IMU sources generate jittery quaternion streams
    /// 2. The synchronization core aligns them onto the output grid
    /// 3. The dispatcher fans emitted frames out to sinks
    #[tokio::test]
    async fn test_e2e_mock_pipeline() {
        let sync_config = SyncCoreConfig {
            output_hz: 100,
            buffer_capacity: Some(100),
            drain_per_tick_limit: 20,
            sensor_map: vec![
                SensorSlot {
                    sensor_id: SensorId::new(0),
                    side: JointSide::Left,
                    placement: SensorPlacement::Thigh,
                },
                SensorSlot {
                    sensor_id: SensorId::new(1),
                    side: JointSide::Left,
                    placement: SensorPlacement::Shin,
                },
            ],
        };
        let core = Pipeline::new(sync_config.clone());

        let mut ingestion = IngestionPipeline::new();
        ingestion
            .register_source(Box::new(MockImuSource::imu(SensorId::new(0), 100.0)))
            .unwrap();
        ingestion
            .register_source(Box::new(MockImuSource::imu(SensorId::new(1), 100.0)))
            .unwrap();

        let (sync_tx, sync_rx) = mpsc::channel::<AlignedSampleSet>(100);
        let sink_configs = vec![SinkConfig {
            name: "test_log".to_string(),
            sink_type: SinkType::Log,
            queue_capacity: 50,
            params: HashMap::new(),
        }];

        let dispatcher = create_dispatcher(sink_configs, sync_rx).await.unwrap();
        let dispatcher_handle = dispatcher.spawn();

        let frame_count = Arc::new(AtomicU64::new(0));
        let frame_count_sub = frame_count.clone();
        core.subscribe(Box::new(move |frame| {
            frame_count_sub.fetch_add(1, Ordering::SeqCst);
            let _ = sync_tx.try_send(*frame);
        }));

        let core_for_ingestion = core.clone();
        ingestion.start_all(move |sensor_id, ts, q| {
            core_for_ingestion.push_sample(sensor_id, ts, q);
        });
        core.start(sync_config.output_hz).unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(300)).await;

        ingestion.stop_all();
        core.stop();

        let _ = tokio::time::timeout(std::time::Duration::from_secs(2), dispatcher_handle).await;

        assert!(
            frame_count.load(Ordering::SeqCst) > 0,
            "synchronization core should have emitted at least one aligned sample set"
        );
    }

    /// Test dispatcher with multiple sink types
    #[tokio::test]
    async fn test_dispatcher_multiple_sinks() {
        let (tx, rx) = mpsc::channel::<AlignedSampleSet>(10);

        let sink_configs = vec![
            SinkConfig {
                name: "log1".to_string(),
                sink_type: SinkType::Log,
                queue_capacity: 50,
                params: HashMap::new(),
            },
            SinkConfig {
                name: "log2".to_string(),
                sink_type: SinkType::Log,
                queue_capacity: 50,
                params: HashMap::new(),
            },
        ];

        let dispatcher = create_dispatcher(sink_configs, rx).await.unwrap();

        let metrics = dispatcher.metrics();
        assert_eq!(metrics.len(), 2);

        let handle = dispatcher.spawn();

        for i in 0..5 {
            let frame = AlignedSampleSet {
                timestamp: i * 10,
                left_knee: None,
                right_knee: None,
            };
            tx.send(frame).await.unwrap();
        }

        drop(tx);

        let _ = tokio::time::timeout(std::time::Duration::from_secs(2), handle).await;
    }
}
