use std::convert::Infallible;

use crate::{
    config::SamplerConfig,
    format::format_sample,
    gpio::AnalogInput,
    serial::TextSink,
    utils::{delay::Delay, sampler_error::SampleLoopError},
};

/// One raw conversion, in `[0, 2^R - 1]` for a converter of R bits.
pub type Sample = u16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LoopState {
    Uninitialized,
    Sampling,
}

/// Drives the acquire, emit, wait cycle over an analog input and a text sink.
///
/// - `config`: The immutable sampling configuration
/// - `analog`: The converter the samples are read from
/// - `sink`: Where every sample is written as one line of text
/// - `delay`: Used to idle `config.period_millis` after every sample
/// - `state`: Whether `initialize` already ran
/// - `iterations`: Completed cycles since initialization
pub struct SampleLoop<A, S, D> {
    config: SamplerConfig,
    analog: A,
    sink: S,
    delay: D,
    state: LoopState,
    iterations: u64,
}

impl<A: AnalogInput, S: TextSink, D: Delay> SampleLoop<A, S, D> {
    /// Creates a new SampleLoop. Nothing is initialized yet.
    ///
    /// # Errors
    ///
    /// - `SampleLoopError::InvalidConfig`: If `config` does not validate
    pub fn new(config: SamplerConfig, analog: A, sink: S, delay: D) -> Result<Self, SampleLoopError> {
        config.validate()?;
        Ok(SampleLoop {
            config,
            analog,
            sink,
            delay,
            state: LoopState::Uninitialized,
            iterations: 0,
        })
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    /// Completed acquire, emit, wait cycles.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Brings up, in order, the text sink, the converter and the configured line.
    /// Must run exactly once before any sampling.
    ///
    /// # Errors
    ///
    /// - `SampleLoopError::AlreadyInitialized`: If called a second time
    /// - `SampleLoopError::TextSinkError`: If the sink could not be brought up
    /// - `SampleLoopError::AnalogInError`: If the converter or the line could not be brought up,
    ///   or the converter cannot produce the configured resolution
    pub fn initialize(&mut self) -> Result<(), SampleLoopError> {
        if self.state == LoopState::Sampling {
            return Err(SampleLoopError::AlreadyInitialized);
        }
        self.sink.init()?;
        log::debug!("Text sink initialized");
        self.analog.init_converter(self.config.resolution_bits)?;
        log::debug!("Analog converter initialized");
        self.analog.enable_line(self.config.line)?;
        self.state = LoopState::Sampling;
        log::debug!(
            "Sampling channel {} on line {} every {} ms",
            self.config.channel,
            self.config.line,
            self.config.period_millis
        );
        Ok(())
    }

    /// Runs a single cycle: select the channel, convert, emit the line and wait.
    ///
    /// # Returns
    ///
    /// The sample that was emitted.
    ///
    /// # Errors
    ///
    /// - `SampleLoopError::NotInitialized`: If `initialize` did not run
    /// - `SampleLoopError::AnalogInError`: If the channel could not be selected or read
    /// - `SampleLoopError::TextSinkError`: If the line could not be written
    pub fn step(&mut self) -> Result<Sample, SampleLoopError> {
        if self.state != LoopState::Sampling {
            return Err(SampleLoopError::NotInitialized);
        }
        self.analog.select_channel(self.config.channel)?;
        let sample = self.analog.read_raw()?;
        self.sink.write_line(&format_sample(self.config.label, sample))?;
        log::trace!("Emitted sample {sample}");
        self.delay.delay_ms(self.config.period_millis);
        self.iterations += 1;
        Ok(sample)
    }

    /// Runs cycles while `should_continue`, given the cycles completed so far in this
    /// call, returns true. The first error halts the loop and is returned.
    ///
    /// # Returns
    ///
    /// The number of cycles completed.
    pub fn run_while<P: FnMut(u64) -> bool>(&mut self, mut should_continue: P) -> Result<u64, SampleLoopError> {
        let mut completed = 0;
        while should_continue(completed) {
            self.step()?;
            completed += 1;
        }
        Ok(completed)
    }

    /// Runs exactly `cycles` cycles unless one of them fails.
    pub fn run_for(&mut self, cycles: u64) -> Result<u64, SampleLoopError> {
        self.run_while(|completed| completed < cycles)
    }

    /// Samples until a cycle fails, which is the only way this returns.
    pub fn run_forever(&mut self) -> Result<Infallible, SampleLoopError> {
        loop {
            self.step()?;
        }
    }

    /// Gives back the collaborators.
    pub fn into_parts(self) -> (A, S, D) {
        (self.analog, self.sink, self.delay)
    }
}

#[cfg(test)]
mod test {
    use std::{
        sync::Mutex,
        time::{Duration, Instant},
    };

    use super::*;
    use crate::{
        format::parse_sample_line,
        gpio::AnalogInError,
        mocks::{new_call_log, written_lines, Call, CallLog, MockAnalogIn, MockDelay, MockTextSink},
        serial::{TextSinkError, WriterSink},
        utils::delay::ThreadDelay,
        ConfigError,
    };

    type MockLoop = SampleLoop<MockAnalogIn, MockTextSink, MockDelay>;

    fn initialize_test(config: SamplerConfig, samples: &[Sample]) -> (CallLog, MockLoop) {
        let log = new_call_log();
        let sampler = SampleLoop::new(
            config,
            MockAnalogIn::new(log.clone(), samples.iter().copied()),
            MockTextSink::new(log.clone()),
            MockDelay::new(log.clone()),
        )
        .unwrap();
        (log, sampler)
    }

    #[test]
    fn test0_initialization_happens_in_order_before_sampling() {
        let config = SamplerConfig::new(4, 4, 100);
        let (log, mut sampler) = initialize_test(config, &[7]);
        sampler.initialize().unwrap();
        sampler.run_for(1).unwrap();
        assert_eq!(
            *log.borrow(),
            vec![
                Call::SinkInit,
                Call::InitConverter(12),
                Call::EnableLine(4),
                Call::SelectChannel(4),
                Call::ReadRaw,
                Call::WriteLine(String::from("7")),
                Call::Delay(100),
            ]
        );
    }

    #[test]
    fn test1_scripted_samples_are_emitted_in_order() {
        let (log, mut sampler) = initialize_test(SamplerConfig::POTENTIOMETER, &[0, 2048, 4095]);
        sampler.initialize().unwrap();
        assert_eq!(sampler.run_for(3), Ok(3));
        assert_eq!(written_lines(&log), vec!["0", "2048", "4095"]);
        assert_eq!(sampler.iterations(), 3);
    }

    #[test]
    fn test2_boundary_samples_round_trip_through_the_format() {
        let config = SamplerConfig::POTENTIOMETER;
        let (log, mut sampler) = initialize_test(config, &[0, config.max_sample()]);
        sampler.initialize().unwrap();
        sampler.run_for(2).unwrap();
        let parsed: Vec<Sample> = written_lines(&log)
            .iter()
            .map(|line| parse_sample_line(config.label, line).unwrap())
            .collect();
        assert_eq!(parsed, vec![0, 4095]);
        assert!(parsed.iter().all(|sample| *sample <= config.max_sample()));
    }

    #[test]
    fn test3_label_is_stable_across_lines() {
        let (log, mut sampler) = initialize_test(SamplerConfig::EEG, &[1042, 0, 9]);
        sampler.initialize().unwrap();
        sampler.run_for(3).unwrap();
        assert_eq!(
            written_lines(&log),
            vec!["EEG reading: 1042", "EEG reading: 0", "EEG reading: 9"]
        );
    }

    #[test]
    fn test4_raw_values_are_not_clamped() {
        let config = SamplerConfig::POTENTIOMETER;
        let (log, mut sampler) = initialize_test(config, &[5000]);
        sampler.initialize().unwrap();
        assert_eq!(sampler.step(), Ok(5000));
        assert_eq!(written_lines(&log), vec!["5000"]);
    }

    #[test]
    fn test5_every_cycle_requests_the_configured_delay() {
        let (log, mut sampler) = initialize_test(SamplerConfig::EEG, &[1, 2, 3]);
        sampler.initialize().unwrap();
        sampler.run_for(3).unwrap();
        let delays: Vec<Call> = log
            .borrow()
            .iter()
            .filter(|call| matches!(call, Call::Delay(_)))
            .cloned()
            .collect();
        assert_eq!(delays, vec![Call::Delay(1000); 3]);
    }

    #[test]
    fn test6_zero_period_still_runs_every_cycle() {
        let config = SamplerConfig::POTENTIOMETER.with_period_millis(0);
        let (log, mut sampler) = initialize_test(config, &[1, 2]);
        sampler.initialize().unwrap();
        assert_eq!(sampler.run_for(2), Ok(2));
        assert_eq!(written_lines(&log), vec!["1", "2"]);
        assert!(log.borrow().iter().all(|call| !matches!(call, Call::Delay(ms) if *ms > 0)));
    }

    #[test]
    fn test7_sampling_before_initialize_fails_without_touching_hardware() {
        let (log, mut sampler) = initialize_test(SamplerConfig::POTENTIOMETER, &[1]);
        assert_eq!(sampler.step(), Err(SampleLoopError::NotInitialized));
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn test8_initialize_twice_fails() {
        let (_log, mut sampler) = initialize_test(SamplerConfig::POTENTIOMETER, &[]);
        sampler.initialize().unwrap();
        assert_eq!(sampler.initialize(), Err(SampleLoopError::AlreadyInitialized));
    }

    #[test]
    fn test9_sink_init_failure_stops_initialization() {
        let log = new_call_log();
        let mut sampler = SampleLoop::new(
            SamplerConfig::POTENTIOMETER,
            MockAnalogIn::new(log.clone(), [1]),
            MockTextSink::new(log.clone()).failing_init(TextSinkError::DriverError),
            MockDelay::new(log.clone()),
        )
        .unwrap();
        assert_eq!(
            sampler.initialize(),
            Err(SampleLoopError::TextSinkError(TextSinkError::DriverError))
        );
        assert_eq!(*log.borrow(), vec![Call::SinkInit]);
        assert_eq!(sampler.step(), Err(SampleLoopError::NotInitialized));
    }

    #[test]
    fn test10_converter_init_failure_stops_initialization() {
        let log = new_call_log();
        let mut sampler = SampleLoop::new(
            SamplerConfig::POTENTIOMETER,
            MockAnalogIn::new(log.clone(), [1]).failing_init(AnalogInError::AdcDriverError),
            MockTextSink::new(log.clone()),
            MockDelay::new(log.clone()),
        )
        .unwrap();
        assert_eq!(
            sampler.initialize(),
            Err(SampleLoopError::AnalogInError(AnalogInError::AdcDriverError))
        );
        assert_eq!(*log.borrow(), vec![Call::SinkInit, Call::InitConverter(12)]);
    }

    #[test]
    fn test11_read_fault_halts_the_loop_deterministically() {
        let log = new_call_log();
        let mut sampler = SampleLoop::new(
            SamplerConfig::POTENTIOMETER,
            MockAnalogIn::new(log.clone(), [10, 20, 30, 40]).failing_read_at(2, AnalogInError::ErrorReading),
            MockTextSink::new(log.clone()),
            MockDelay::new(log.clone()),
        )
        .unwrap();
        sampler.initialize().unwrap();
        assert_eq!(
            sampler.run_for(4),
            Err(SampleLoopError::AnalogInError(AnalogInError::ErrorReading))
        );
        assert_eq!(written_lines(&log), vec!["10", "20"]);
        assert_eq!(sampler.iterations(), 2);
        assert_eq!(log.borrow().last(), Some(&Call::ReadRaw));
    }

    #[test]
    fn test12_write_fault_halts_before_the_delay() {
        let log = new_call_log();
        let mut sampler = SampleLoop::new(
            SamplerConfig::POTENTIOMETER,
            MockAnalogIn::new(log.clone(), [10, 20]),
            MockTextSink::new(log.clone()).failing_write_at(0, TextSinkError::WriteError),
            MockDelay::new(log.clone()),
        )
        .unwrap();
        sampler.initialize().unwrap();
        assert_eq!(
            sampler.run_forever(),
            Err(SampleLoopError::TextSinkError(TextSinkError::WriteError))
        );
        assert!(log.borrow().iter().all(|call| !matches!(call, Call::Delay(_))));
    }

    #[test]
    fn test13_run_forever_only_stops_on_a_fault() {
        let (log, mut sampler) = initialize_test(SamplerConfig::POTENTIOMETER, &[1, 2, 3, 4, 5]);
        sampler.initialize().unwrap();
        // The mock faults once its script is exhausted
        assert_eq!(
            sampler.run_forever(),
            Err(SampleLoopError::AnalogInError(AnalogInError::ErrorReading))
        );
        assert_eq!(written_lines(&log), vec!["1", "2", "3", "4", "5"]);
    }

    #[test]
    fn test14_run_while_sees_completed_cycles() {
        let (_log, mut sampler) = initialize_test(SamplerConfig::POTENTIOMETER, &[1, 2, 3, 4]);
        sampler.initialize().unwrap();
        let mut seen = Vec::new();
        let completed = sampler
            .run_while(|done| {
                seen.push(done);
                done < 2
            })
            .unwrap();
        assert_eq!(completed, 2);
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[test]
    fn test15_invalid_config_is_rejected() {
        let log = new_call_log();
        let result = SampleLoop::new(
            SamplerConfig::POTENTIOMETER.with_resolution_bits(0),
            MockAnalogIn::new(log.clone(), [1]),
            MockTextSink::new(log.clone()),
            MockDelay::new(log.clone()),
        );
        assert!(matches!(
            result,
            Err(SampleLoopError::InvalidConfig(ConfigError::InvalidResolution(0)))
        ));
    }

    #[test]
    fn test16_channel_mismatch_halts_the_loop() {
        let log = new_call_log();
        let mut sampler = SampleLoop::new(
            SamplerConfig::new(2, 3, 0),
            MockAnalogIn::new(log.clone(), [1]).bound_to_line_channel(),
            MockTextSink::new(log.clone()),
            MockDelay::new(log.clone()),
        )
        .unwrap();
        sampler.initialize().unwrap();
        assert_eq!(
            sampler.step(),
            Err(SampleLoopError::AnalogInError(AnalogInError::ChannelMismatch { bound: 2, requested: 3 }))
        );
        assert!(written_lines(&log).is_empty());
    }

    #[test]
    fn test17_real_clock_gaps_respect_the_period() {
        const PERIOD_MS: u32 = 15;
        let log = new_call_log();
        let mut sampler = SampleLoop::new(
            SamplerConfig::POTENTIOMETER.with_period_millis(PERIOD_MS),
            MockAnalogIn::new(log.clone(), [1, 2, 3, 4]),
            MockTextSink::new(log.clone()).with_timestamps(),
            ThreadDelay,
        )
        .unwrap();
        sampler.initialize().unwrap();
        let start = Instant::now();
        sampler.run_for(4).unwrap();
        assert!(start.elapsed() >= Duration::from_millis(4 * PERIOD_MS as u64));
        let (_analog, sink, _delay) = sampler.into_parts();
        let timestamps = sink.timestamps();
        assert_eq!(timestamps.len(), 4);
        for pair in timestamps.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_millis(PERIOD_MS as u64));
        }
    }

    #[test]
    fn test18_console_sink_stream_matches_the_wire_format() {
        let log = new_call_log();
        let mut sampler = SampleLoop::new(
            SamplerConfig::EEG.with_period_millis(0),
            MockAnalogIn::new(log.clone(), [0, 2048, 4095]),
            WriterSink::new(Vec::new()),
            MockDelay::new(log.clone()),
        )
        .unwrap();
        sampler.initialize().unwrap();
        sampler.run_for(3).unwrap();
        let (_analog, sink, _delay) = sampler.into_parts();
        let output = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(output, "EEG reading: 0\nEEG reading: 2048\nEEG reading: 4095\n");
    }

    #[test]
    fn test19_unsupported_resolution_fails_initialization() {
        let log = new_call_log();
        let mut sampler = SampleLoop::new(
            SamplerConfig::POTENTIOMETER.with_resolution_bits(10),
            MockAnalogIn::new(log.clone(), [4095]),
            MockTextSink::new(log.clone()),
            MockDelay::new(log.clone()),
        )
        .unwrap();
        assert_eq!(
            sampler.initialize(),
            Err(SampleLoopError::AnalogInError(AnalogInError::UnsupportedResolution(10)))
        );
        assert_eq!(*log.borrow(), vec![Call::SinkInit, Call::InitConverter(10)]);
        assert_eq!(sampler.step(), Err(SampleLoopError::NotInitialized));
    }

    #[test]
    fn test20_supported_resolution_bounds_the_samples() {
        let log = new_call_log();
        let config = SamplerConfig::POTENTIOMETER.with_resolution_bits(10);
        let mut sampler = SampleLoop::new(
            config,
            MockAnalogIn::new(log.clone(), [0, 1023]).with_resolution_bits(10),
            MockTextSink::new(log.clone()),
            MockDelay::new(log.clone()),
        )
        .unwrap();
        sampler.initialize().unwrap();
        sampler.run_for(2).unwrap();
        assert_eq!(written_lines(&log), vec!["0", "1023"]);
        assert!(log.borrow().contains(&Call::InitConverter(10)));
        assert_eq!(config.max_sample(), 1023);
    }

    struct CapturingLogger {
        records: Mutex<Vec<(log::Level, String)>>,
    }

    impl log::Log for CapturingLogger {
        fn enabled(&self, _metadata: &log::Metadata<'_>) -> bool {
            true
        }

        fn log(&self, record: &log::Record<'_>) {
            if record.target().starts_with("adc_streamer") {
                if let Ok(mut records) = self.records.lock() {
                    records.push((record.level(), record.args().to_string()));
                }
            }
        }

        fn flush(&self) {}
    }

    static LOGGER: CapturingLogger = CapturingLogger { records: Mutex::new(Vec::new()) };

    #[test]
    fn test21_sampling_logs_nothing_on_the_stream_at_default_level() {
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(log::LevelFilter::Trace);
        let (_log, mut sampler) = initialize_test(SamplerConfig::POTENTIOMETER, &[1, 2]);
        sampler.initialize().unwrap();
        sampler.run_for(2).unwrap();
        let records = LOGGER.records.lock().unwrap();
        assert!(records.iter().any(|(_, message)| message.starts_with("Sampling channel")));
        assert!(records.iter().all(|(level, _)| *level > log::Level::Info));
    }
}
