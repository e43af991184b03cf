#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use alloy::primitives::U256;

    use super::super::*;
    use crate::network::ChainDataSource;
    use crate::series::{BlockWindow, Point};
    use crate::test_utils::builders::{ConfigBuilder, RawBlockBuilder};
    use crate::test_utils::mocks::{FailureConfig, MockChainSource};

    // Helper function to create a controller over a mock source
    fn create_controller(mock: &Arc<MockChainSource>) -> Arc<RefreshController> {
        let config = ConfigBuilder::new().build();
        let source: Arc<dyn ChainDataSource> = mock.clone();
        Arc::new(RefreshController::from_config(&config, source).unwrap())
    }

    fn assert_aligned(state: &DashboardState, latest: u64) {
        let window = BlockWindow::ending_at(latest, 10);
        assert!(window.matches(&state.volume), "volume misaligned");
        assert!(window.matches(&state.base_fee), "base fee misaligned");
        assert!(window.matches(&state.gas_usage), "gas usage misaligned");
    }

    mod fetcher_tests {
        use super::*;

        #[test]
        fn test_provider_errors_are_classified() {
            let unavailable: FetchError =
                crate::network::ProviderError::unavailable("get_logs", "timeout").into();
            assert!(matches!(unavailable, FetchError::ProviderUnavailable(_)));

            let malformed: FetchError =
                crate::network::ProviderError::malformed("get_block", "no base fee").into();
            assert!(matches!(malformed, FetchError::MalformedResult(_)));

            let derivation: FetchError =
                crate::series::DerivationError::ZeroGasLimit { block: 1 }.into();
            assert!(matches!(derivation, FetchError::MalformedResult(_)));
        }

        #[test]
        fn test_validate_series() {
            let window = BlockWindow::ending_at(2, 2);
            assert!(validate_series(&window, &[Point::new(1, 0.0), Point::new(2, 0.0)]).is_ok());
            assert!(matches!(
                validate_series(&window, &[Point::new(2, 0.0)]),
                Err(FetchError::MalformedResult(_))
            ));
        }

        #[tokio::test]
        async fn test_volume_pipeline_queries_each_block_once() {
            let mock = Arc::new(
                MockChainSource::new(100)
                    .with_transfers(95, vec![U256::from(12_000_000u64), U256::from(345_678u64)])
                    .with_transfers(100, vec![U256::from(500_000u64)]),
            );
            let token = TokenTarget::from_config(&ConfigBuilder::new().build().token).unwrap();
            let fetcher = SeriesFetcher::new(mock.clone(), token, 10);

            let series = fetcher.fetch_volume_series().await.unwrap();

            assert_eq!(series.len(), 10);
            assert_eq!(series[4], Point::new(95, 12.35));
            assert_eq!(series[9], Point::new(100, 0.5));
            assert_eq!(series[0], Point::new(91, 0.0));
            assert_eq!(mock.log_calls(), 10);
            assert_eq!(mock.latest_calls(), 1);
        }

        #[tokio::test]
        async fn test_single_failed_block_fails_the_pipeline() {
            let mock = Arc::new(MockChainSource::with_failures(
                100,
                FailureConfig {
                    fail_block_number: Some(97),
                    ..Default::default()
                },
            ));
            let token = TokenTarget::from_config(&ConfigBuilder::new().build().token).unwrap();
            let fetcher = SeriesFetcher::new(mock.clone(), token, 10);

            let result = fetcher.fetch_fee_and_usage_series().await;

            assert!(matches!(result, Err(FetchError::ProviderUnavailable(_))));
        }

        #[tokio::test]
        async fn test_misnumbered_block_is_malformed() {
            let mock = Arc::new(
                MockChainSource::new(100).with_block_at(96, RawBlockBuilder::new(42).build()),
            );
            let token = TokenTarget::from_config(&ConfigBuilder::new().build().token).unwrap();
            let fetcher = SeriesFetcher::new(mock, token, 10);

            let result = fetcher.fetch_fee_and_usage_series().await;

            assert!(matches!(result, Err(FetchError::MalformedResult(_))));
        }
    }

    mod refresh_cycle_tests {
        use super::*;

        #[tokio::test]
        async fn test_initial_state() {
            let mock = Arc::new(MockChainSource::new(100));
            let controller = create_controller(&mock);

            let state = controller.snapshot().await;

            assert!(state.loading);
            assert!(!state.refreshing);
            assert!(!state.has_data());
            assert_eq!(state.countdown, 12);
            assert!(state.last_update.is_none());
        }

        #[tokio::test]
        async fn test_successful_cycle_fills_aligned_series() {
            let mock = Arc::new(MockChainSource::new(18_000_000));
            let controller = create_controller(&mock);

            let outcome = controller.refresh_cycle().await;
            let state = controller.snapshot().await;

            assert!(outcome.is_success());
            assert_aligned(&state, 18_000_000);
            assert!(!state.loading);
            assert!(!state.refreshing);
            assert!(state.last_update.is_some());
            assert_eq!(state.countdown, 12);
            assert_eq!(state.cycles_completed, 1);
            assert_eq!(state.latest_block(), Some(18_000_000));
            assert!(state.gas_usage[0].base_fee_increase);
        }

        #[tokio::test]
        async fn test_fee_failure_resets_all_series() {
            let mock = Arc::new(MockChainSource::new(200));
            let controller = create_controller(&mock);
            controller.refresh_cycle().await;

            mock.set_latest(201);
            mock.set_failures(FailureConfig::fail_on_operation("blocks"));
            let outcome = controller.refresh_cycle().await;
            let state = controller.snapshot().await;

            assert!(outcome.volume_ok);
            assert!(!outcome.fee_usage_ok);
            // The volume fetched in this cycle is discarded along with the rest
            assert!(state.volume.is_empty());
            assert!(state.base_fee.is_empty());
            assert!(state.gas_usage.is_empty());
            assert!(!state.refreshing);
            assert_eq!(state.cycles_completed, 2);
        }

        #[tokio::test]
        async fn test_volume_failure_keeps_fee_series() {
            let mock = Arc::new(MockChainSource::with_failures(
                300,
                FailureConfig::fail_on_operation("logs"),
            ));
            let controller = create_controller(&mock);

            let outcome = controller.refresh_cycle().await;
            let state = controller.snapshot().await;

            assert!(!outcome.volume_ok);
            assert!(outcome.fee_usage_ok);
            assert!(state.volume.is_empty());
            assert_eq!(state.base_fee.len(), 10);
            assert_eq!(state.gas_usage.len(), 10);
        }

        #[tokio::test]
        async fn test_volume_failure_after_success_replaces_fee_series() {
            let mock = Arc::new(MockChainSource::new(300));
            let controller = create_controller(&mock);
            controller.refresh_cycle().await;

            mock.set_latest(305);
            mock.set_failures(FailureConfig::fail_on_operation("logs"));
            controller.refresh_cycle().await;
            let state = controller.snapshot().await;

            assert!(state.volume.is_empty());
            assert!(BlockWindow::ending_at(305, 10).matches(&state.base_fee));
            assert!(BlockWindow::ending_at(305, 10).matches(&state.gas_usage));
        }

        #[tokio::test]
        async fn test_provider_outage_resets_everything() {
            let mock = Arc::new(MockChainSource::new(400));
            let controller = create_controller(&mock);
            controller.refresh_cycle().await;
            assert!(controller.snapshot().await.has_data());

            mock.set_failures(FailureConfig::fail_on_operation("latest"));
            let outcome = controller.refresh_cycle().await;
            let state = controller.snapshot().await;

            assert!(!outcome.volume_ok);
            assert!(!outcome.fee_usage_ok);
            assert!(!state.has_data());
            assert!(!state.loading);
            assert!(!state.refreshing);
            assert_eq!(state.countdown, 12);
            assert_eq!(state.cycles_completed, 2);
        }

        #[tokio::test]
        async fn test_zero_gas_limit_resets_all_series() {
            let mock = Arc::new(
                MockChainSource::new(500).with_block(RawBlockBuilder::new(495).with_gas(0, 0).build()),
            );
            let controller = create_controller(&mock);

            let outcome = controller.refresh_cycle().await;
            let state = controller.snapshot().await;

            assert!(outcome.volume_ok);
            assert!(!outcome.fee_usage_ok);
            assert!(!state.has_data());
        }

        #[tokio::test(start_paused = true)]
        async fn test_refreshing_keeps_displayed_series() {
            let mock = Arc::new(MockChainSource::new(600));
            let controller = create_controller(&mock);
            controller.refresh_cycle().await;
            let before = controller.snapshot().await;

            mock.set_delay(Duration::from_secs(5));
            let handle = controller.manual_refresh();
            tokio::time::sleep(Duration::from_secs(1)).await;

            let during = controller.snapshot().await;
            assert!(during.refreshing);
            assert_eq!(during.volume, before.volume);
            assert_eq!(during.base_fee, before.base_fee);

            handle.await.unwrap();
            assert!(!controller.snapshot().await.refreshing);
        }

        #[tokio::test(start_paused = true)]
        async fn test_overlapping_cycles_last_writer_wins() {
            let mock = Arc::new(MockChainSource::new(100));
            let controller = create_controller(&mock);

            // Slow cycle sees block 100
            mock.set_delay(Duration::from_secs(5));
            let slow = controller.manual_refresh();
            tokio::time::sleep(Duration::from_millis(10)).await;

            // Fast cycle sees block 200 and finishes first
            mock.set_latest(200);
            mock.set_delay(Duration::from_secs(1));
            let fast = controller.manual_refresh();

            tokio::time::sleep(Duration::from_secs(3)).await;
            assert!(fast.is_finished());
            assert_aligned(&controller.snapshot().await, 200);

            slow.await.unwrap();
            let state = controller.snapshot().await;
            assert_aligned(&state, 100);
            assert_eq!(state.cycles_completed, 2);
        }
    }

    mod timer_tests {
        use super::*;

        #[tokio::test]
        async fn test_countdown_wraps_around() {
            let mock = Arc::new(MockChainSource::new(100));
            let controller = create_controller(&mock);

            let mut ticks = Vec::new();
            for _ in 0..26 {
                ticks.push(controller.countdown_tick().await);
            }

            let mut expected: Vec<u64> = (0..12).rev().collect();
            expected.push(12);
            expected.extend((0..12).rev());
            expected.push(12);
            assert_eq!(ticks, expected);
        }

        #[tokio::test]
        async fn test_countdown_is_independent_of_failures() {
            let mock = Arc::new(MockChainSource::with_failures(100, FailureConfig::fail_all()));
            let controller = create_controller(&mock);
            controller.refresh_cycle().await;

            assert_eq!(controller.countdown_tick().await, 11);
            assert_eq!(controller.countdown_tick().await, 10);
        }

        #[tokio::test(start_paused = true)]
        async fn test_start_refreshes_immediately_and_on_interval() {
            let mock = Arc::new(MockChainSource::new(100));
            let controller = create_controller(&mock);

            controller.start();
            assert!(controller.is_running());
            tokio::time::sleep(Duration::from_millis(100)).await;
            assert_eq!(controller.snapshot().await.cycles_completed, 1);

            tokio::time::sleep(Duration::from_millis(5_400)).await;
            assert_eq!(controller.snapshot().await.countdown, 7);

            tokio::time::sleep(Duration::from_millis(7_000)).await;
            assert_eq!(controller.snapshot().await.cycles_completed, 2);

            controller.stop();
        }

        #[tokio::test(start_paused = true)]
        async fn test_stop_cancels_both_timers() {
            let mock = Arc::new(MockChainSource::new(100));
            let controller = create_controller(&mock);

            controller.start();
            tokio::time::sleep(Duration::from_millis(2_500)).await;
            controller.stop();
            assert!(!controller.is_running());

            let stopped = controller.snapshot().await;
            tokio::time::sleep(Duration::from_secs(60)).await;
            let later = controller.snapshot().await;

            assert_eq!(later.cycles_completed, stopped.cycles_completed);
            assert_eq!(later.countdown, stopped.countdown);
            assert_eq!(mock.latest_calls(), 2);
        }

        #[tokio::test(start_paused = true)]
        async fn test_start_twice_is_a_noop() {
            let mock = Arc::new(MockChainSource::new(100));
            let controller = create_controller(&mock);

            controller.start();
            controller.start();
            tokio::time::sleep(Duration::from_millis(100)).await;

            // One immediate cycle, one latest-block call per pipeline
            assert_eq!(mock.latest_calls(), 2);
            controller.stop();
        }

        #[tokio::test]
        async fn test_manual_refresh_runs_a_cycle() {
            let mock = Arc::new(MockChainSource::new(100));
            let controller = create_controller(&mock);
            let mut cycles = controller.subscribe();

            let outcome = controller.manual_refresh().await.unwrap();

            assert!(outcome.is_success());
            cycles.changed().await.unwrap();
            assert_eq!(*cycles.borrow(), 1);
        }
    }
}
