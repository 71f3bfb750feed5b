/// Sound engine: procedural chiptune cues via rodio.
///
/// Every cue is synthesized into an in-memory WAV buffer at init time and
/// played fire-and-forget through a detached Sink. The background loop is
/// the one sound that keeps its Sink, so it can be paused and stopped.
///
/// Build without the "sound" feature to drop audio entirely (the stub
/// SoundEngine does nothing). Muting is decided by the caller.

#[cfg(feature = "sound")]
mod inner {
    use std::cell::RefCell;
    use std::f32::consts::TAU;
    use std::io::Cursor;
    use std::sync::Arc;

    use log::{debug, warn};
    use rodio::{OutputStream, OutputStreamHandle, Sink, Source};

    const SAMPLE_RATE: u32 = 22050;

    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_found: Arc<Vec<u8>>,
        sfx_miss: Arc<Vec<u8>>,
        sfx_start: Arc<Vec<u8>>,
        sfx_clear: Arc<Vec<u8>>,
        sfx_all_clear: Arc<Vec<u8>>,
        sfx_timed_out: Arc<Vec<u8>>,
        music_track: Arc<Vec<u8>>,
        music: RefCell<Option<Sink>>,
    }

    impl SoundEngine {
        /// `None` when no output device is available.
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    warn!("audio disabled: {e}");
                    return None;
                }
            };

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_found: Arc::new(make_wav(&gen_found())),
                sfx_miss: Arc::new(make_wav(&gen_miss())),
                sfx_start: Arc::new(make_wav(&gen_start())),
                sfx_clear: Arc::new(make_wav(&gen_clear())),
                sfx_all_clear: Arc::new(make_wav(&gen_all_clear())),
                sfx_timed_out: Arc::new(make_wav(&gen_timed_out())),
                music_track: Arc::new(make_wav(&gen_music())),
                music: RefCell::new(None),
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            let sink = match Sink::try_new(&self.handle) {
                Ok(s) => s,
                Err(e) => {
                    warn!("audio sink: {e}");
                    return;
                }
            };
            match rodio::Decoder::new(Cursor::new(buf.as_ref().clone())) {
                Ok(src) => {
                    sink.append(src);
                    sink.detach();
                }
                Err(e) => warn!("audio decode: {e}"),
            }
        }

        pub fn play_found(&self) { self.play(&self.sfx_found); }
        pub fn play_miss(&self) { self.play(&self.sfx_miss); }
        pub fn play_start(&self) { self.play(&self.sfx_start); }
        pub fn play_clear(&self) { self.play(&self.sfx_clear); }
        pub fn play_all_clear(&self) { self.play(&self.sfx_all_clear); }
        pub fn play_timed_out(&self) { self.play(&self.sfx_timed_out); }

        // ── Background music ──

        /// (Re)start the loop from the top. A paused loop stays silent until
        /// `set_music_paused(false)`.
        pub fn start_music(&self, paused: bool) {
            self.stop_music();
            let sink = match Sink::try_new(&self.handle) {
                Ok(s) => s,
                Err(e) => {
                    warn!("music sink: {e}");
                    return;
                }
            };
            match rodio::Decoder::new(Cursor::new(self.music_track.as_ref().clone())) {
                Ok(src) => {
                    sink.append(src.repeat_infinite());
                    if paused {
                        sink.pause();
                    }
                    debug!("music started (paused: {paused})");
                    *self.music.borrow_mut() = Some(sink);
                }
                Err(e) => warn!("music decode: {e}"),
            }
        }

        pub fn stop_music(&self) {
            if let Some(sink) = self.music.borrow_mut().take() {
                sink.stop();
            }
        }

        /// Follows mute. No-op when the loop is not running.
        pub fn set_music_paused(&self, paused: bool) {
            if let Some(sink) = self.music.borrow().as_ref() {
                if paused {
                    sink.pause();
                } else {
                    sink.play();
                }
            }
        }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators: all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    /// A run of notes. `harmonics` are (multiple, weight) pairs added to
    /// the fundamental; `decay` shapes each note's envelope.
    fn gen_notes(notes: &[(f32, f32)], harmonics: &[(f32, f32)], decay: f32, volume: f32) -> Vec<f32> {
        let mut samples = Vec::new();
        for &(freq, dur) in notes {
            let n = (SAMPLE_RATE as f32 * dur) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32).powf(decay);
                let wave: f32 = harmonics
                    .iter()
                    .map(|&(mult, weight)| (t * freq * mult * TAU).sin() * weight)
                    .sum();
                samples.push(wave * env * volume);
            }
        }
        samples
    }

    /// Word found: bright arpeggio E6→G6→C7
    fn gen_found() -> Vec<f32> {
        gen_notes(
            &[(1319.0, 0.05), (1568.0, 0.05), (2093.0, 0.09)],
            &[(1.0, 0.7), (3.0, 0.3)],
            0.5,
            0.25,
        )
    }

    /// No match: short low buzz
    fn gen_miss() -> Vec<f32> {
        gen_notes(&[(180.0, 0.09)], &[(1.0, 0.5), (2.0, 0.3), (3.0, 0.2)], 0.8, 0.2)
    }

    /// Level start: two-note chime G5, C6
    fn gen_start() -> Vec<f32> {
        gen_notes(&[(784.0, 0.08), (1047.0, 0.15)], &[(1.0, 0.7), (2.0, 0.3)], 0.5, 0.3)
    }

    /// Level cleared: ascending fanfare C5→E5→G5→C6 with a held top note
    fn gen_clear() -> Vec<f32> {
        let mut samples = gen_notes(
            &[(523.0, 0.1), (659.0, 0.1), (784.0, 0.1)],
            &[(1.0, 0.6), (2.0, 0.3), (3.0, 0.1)],
            1.0,
            0.3,
        );
        samples.extend(gen_notes(&[(1047.0, 0.3)], &[(1.0, 1.0)], 1.0, 0.3));
        samples
    }

    /// Run complete: the clear fanfare followed by a high trill
    fn gen_all_clear() -> Vec<f32> {
        let mut samples = gen_clear();
        let trill: Vec<(f32, f32)> = (0..6)
            .map(|i| (if i % 2 == 0 { 1568.0 } else { 2093.0 }, 0.06))
            .collect();
        samples.extend(gen_notes(&trill, &[(1.0, 0.7), (3.0, 0.3)], 0.4, 0.25));
        samples
    }

    /// Time up: sad descending A4→F#4→Eb4→C4 with a tail fade
    fn gen_timed_out() -> Vec<f32> {
        let mut samples = gen_notes(
            &[(440.0, 0.12), (370.0, 0.12), (311.0, 0.12), (261.0, 0.2)],
            &[(1.0, 1.0)],
            1.0,
            0.3,
        );
        let total = samples.len();
        let fade_len = total / 4;
        for (i, s) in samples.iter_mut().enumerate().skip(total - fade_len) {
            *s *= (total - i) as f32 / fade_len as f32;
        }
        samples
    }

    /// Background loop: a quiet A-minor pentatonic phrase over a root-fifth
    /// bass, eight beats at 120 bpm. Both voices have equal length so the
    /// loop point lands on a bar line.
    fn gen_music() -> Vec<f32> {
        const BEAT: f32 = 0.25;
        let melody: Vec<(f32, f32)> = [
            440.0, 523.0, 587.0, 659.0, 784.0, 659.0, 587.0, 523.0,
            440.0, 392.0, 440.0, 523.0, 587.0, 523.0, 440.0, 392.0,
        ]
        .iter()
        .map(|&f| (f, BEAT))
        .collect();
        let bass: Vec<(f32, f32)> = [110.0, 165.0, 110.0, 165.0, 98.0, 147.0, 110.0, 165.0]
            .iter()
            .map(|&f| (f, BEAT * 2.0))
            .collect();

        let lead = gen_notes(&melody, &[(1.0, 0.6), (2.0, 0.25)], 0.7, 0.08);
        let low = gen_notes(&bass, &[(1.0, 0.8), (3.0, 0.2)], 1.5, 0.1);
        lead.iter().zip(low.iter()).map(|(a, b)| a + b).collect()
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder: 16-bit mono PCM
    // ════════════════════════════════════════════════════════════

    pub(super) fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2;
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        // RIFF header
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        // fmt chunk
        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes()); // PCM
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        // data chunk
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());
        for &s in samples {
            let val = (s.clamp(-1.0, 1.0) * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn wav_header_matches_payload() {
            let samples = gen_found();
            let wav = make_wav(&samples);
            assert_eq!(&wav[0..4], b"RIFF");
            assert_eq!(&wav[8..12], b"WAVE");
            assert_eq!(wav.len(), 44 + samples.len() * 2);
            let data_size = u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]);
            assert_eq!(data_size as usize, samples.len() * 2);
        }

        #[test]
        fn cues_stay_in_range() {
            for cue in [gen_found(), gen_miss(), gen_start(), gen_all_clear(), gen_timed_out()] {
                assert!(!cue.is_empty());
                assert!(cue.iter().all(|s| s.abs() <= 1.0));
            }
        }

        #[test]
        fn music_loop_is_four_seconds_and_quiet() {
            let track = gen_music();
            let four_secs = SAMPLE_RATE as usize * 4;
            // Per-note rounding may drop a few samples.
            assert!(track.len() <= four_secs && track.len() > four_secs - 32);
            assert!(track.iter().all(|s| s.abs() <= 0.5));
            assert!(track.iter().any(|s| s.abs() > 0.01));
        }
    }
}

// ════════════════════════════════════════════════════════════
//  Public API: compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_found(&self) {}
    pub fn play_miss(&self) {}
    pub fn play_start(&self) {}
    pub fn play_clear(&self) {}
    pub fn play_all_clear(&self) {}
    pub fn play_timed_out(&self) {}
    pub fn start_music(&self, _paused: bool) {}
    pub fn stop_music(&self) {}
    pub fn set_music_paused(&self, _paused: bool) {}
}
