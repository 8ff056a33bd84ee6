//! Microphone capture using CPAL (Cross-Platform Audio Library).

use crate::audio::source::AudioSource;
use crate::defaults;
use crate::error::{Result, SightlineError};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::{Arc, Mutex};

/// Preferred device names for desktop PipeWire/PulseAudio environments.
const PREFERRED_DEVICES: &[&str] = &["pipewire", "pulse", "PulseAudio"];

/// Device name patterns that are never useful for voice input.
const FILTERED_PATTERNS: &[&str] = &[
    "surround", "front:", "rear:", "center:", "side:", "HDMI", "S/PDIF",
];

fn should_filter_device(name: &str) -> bool {
    let lower = name.to_lowercase();
    FILTERED_PATTERNS
        .iter()
        .any(|pattern| lower.contains(&pattern.to_lowercase()))
}

fn is_preferred_device(name: &str) -> bool {
    let lower = name.to_lowercase();
    PREFERRED_DEVICES
        .iter()
        .any(|pref| lower.contains(&pref.to_lowercase()))
}

/// List available audio input devices, recommended ones marked.
///
/// CPAL probes several backends (ALSA, JACK, Pulse) during enumeration and
/// some of them print warnings; [`crate::sys::suppress_audio_warnings`] sets
/// env hints at startup to keep them quiet.
pub fn list_devices() -> Result<Vec<String>> {
    let host = cpal::default_host();
    let devices = host
        .input_devices()
        .map_err(|e| SightlineError::AudioCapture {
            message: format!("Failed to enumerate input devices: {}", e),
        })?;

    let mut device_names = Vec::new();
    for device in devices {
        if let Ok(name) = device.name() {
            if should_filter_device(&name) {
                continue;
            }
            if is_preferred_device(&name) {
                device_names.push(format!("{} [recommended]", name));
            } else {
                device_names.push(name);
            }
        }
    }

    Ok(device_names)
}

/// Pick the best default input device, preferring PipeWire/PulseAudio so the
/// desktop's device selection is respected.
fn best_default_device() -> Result<cpal::Device> {
    let host = cpal::default_host();

    if let Ok(devices) = host.input_devices() {
        for device in devices {
            if let Ok(name) = device.name()
                && is_preferred_device(&name)
            {
                return Ok(device);
            }
        }
    }

    host.default_input_device()
        .ok_or_else(|| SightlineError::AudioDeviceNotFound {
            device: "default".to_string(),
        })
}

/// Wrapper for cpal::Stream to make it Send.
///
/// SAFETY: the stream is only touched through the Mutex in CpalAudioSource,
/// so access is exclusive even when the source moves between threads.
struct SendableStream(cpal::Stream);

unsafe impl Send for SendableStream {}

/// Microphone source capturing 16-bit PCM mono at 16 kHz, as the recognizer
/// expects. Tries an i16 stream at the target rate first, then f32, then the
/// device's native config with software channel mixing and resampling.
pub struct CpalAudioSource {
    device: cpal::Device,
    stream: Arc<Mutex<Option<SendableStream>>>,
    buffer: Arc<Mutex<Vec<i16>>>,
    sample_rate: u32,
}

impl CpalAudioSource {
    /// Open the named device, or the best default when `device_name` is None.
    pub fn new(device_name: Option<&str>) -> Result<Self> {
        let device = match device_name {
            Some(name) => {
                let host = cpal::default_host();
                let devices = host
                    .input_devices()
                    .map_err(|e| SightlineError::AudioCapture {
                        message: format!("Failed to enumerate devices: {}", e),
                    })?;

                devices
                    .into_iter()
                    .find(|dev| dev.name().map(|n| n == name).unwrap_or(false))
                    .ok_or_else(|| SightlineError::AudioDeviceNotFound {
                        device: name.to_string(),
                    })?
            }
            None => best_default_device()?,
        };

        Ok(Self {
            device,
            stream: Arc::new(Mutex::new(None)),
            buffer: Arc::new(Mutex::new(Vec::new())),
            sample_rate: defaults::SAMPLE_RATE,
        })
    }

    fn build_stream(&self) -> Result<cpal::Stream> {
        let target_config = cpal::StreamConfig {
            channels: 1,
            sample_rate: cpal::SampleRate(self.sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let err_callback = |err| {
            eprintln!("Audio stream error: {}", err);
        };

        // i16 at the target rate: zero-copy when the backend converts for us.
        let buffer = Arc::clone(&self.buffer);
        if let Ok(stream) = self.device.build_input_stream(
            &target_config,
            move |data: &[i16], _: &cpal::InputCallbackInfo| {
                if let Ok(mut buf) = buffer.lock() {
                    buf.extend_from_slice(data);
                }
            },
            err_callback,
            None,
        ) {
            return Ok(stream);
        }

        // f32 at the target rate, for devices that only expose float formats.
        let buffer = Arc::clone(&self.buffer);
        if let Ok(stream) = self.device.build_input_stream(
            &target_config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                if let Ok(mut buf) = buffer.lock() {
                    buf.extend(data.iter().map(|&s| f32_to_i16(s)));
                }
            },
            err_callback,
            None,
        ) {
            return Ok(stream);
        }

        self.build_native_stream()
    }

    /// Capture at the device's native config, converting in software.
    fn build_native_stream(&self) -> Result<cpal::Stream> {
        use cpal::SampleFormat;

        let default_config =
            self.device
                .default_input_config()
                .map_err(|e| SightlineError::AudioCapture {
                    message: format!("Failed to query default input config: {}", e),
                })?;

        let native_rate = default_config.sample_rate().0;
        let native_channels = default_config.channels() as usize;
        let target_rate = self.sample_rate;
        let stream_config: cpal::StreamConfig = default_config.clone().into();

        let err_callback = |err| {
            eprintln!("Audio stream error: {}", err);
        };

        let buffer = Arc::clone(&self.buffer);
        match default_config.sample_format() {
            SampleFormat::I16 => self
                .device
                .build_input_stream(
                    &stream_config,
                    move |data: &[i16], _: &cpal::InputCallbackInfo| {
                        let converted =
                            mix_and_resample(data, native_channels, native_rate, target_rate);
                        if let Ok(mut buf) = buffer.lock() {
                            buf.extend_from_slice(&converted);
                        }
                    },
                    err_callback,
                    None,
                )
                .map_err(|e| SightlineError::AudioCapture {
                    message: format!("Failed to build native i16 stream: {}", e),
                }),
            SampleFormat::F32 => self
                .device
                .build_input_stream(
                    &stream_config,
                    move |data: &[f32], _: &cpal::InputCallbackInfo| {
                        let i16_data: Vec<i16> = data.iter().map(|&s| f32_to_i16(s)).collect();
                        let converted =
                            mix_and_resample(&i16_data, native_channels, native_rate, target_rate);
                        if let Ok(mut buf) = buffer.lock() {
                            buf.extend_from_slice(&converted);
                        }
                    },
                    err_callback,
                    None,
                )
                .map_err(|e| SightlineError::AudioCapture {
                    message: format!("Failed to build native f32 stream: {}", e),
                }),
            fmt => Err(SightlineError::AudioCapture {
                message: format!(
                    "Unsupported native sample format: {:?}. \
                     Try specifying a device with --device.",
                    fmt
                ),
            }),
        }
    }
}

fn f32_to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16
}

/// Mix multi-channel audio to mono and linearly resample to the target rate.
fn mix_and_resample(
    samples: &[i16],
    channels: usize,
    source_rate: u32,
    target_rate: u32,
) -> Vec<i16> {
    let mono: Vec<i16> = if channels <= 1 {
        samples.to_vec()
    } else {
        samples
            .chunks_exact(channels)
            .map(|frame| {
                let sum: i32 = frame.iter().map(|&s| s as i32).sum();
                (sum / channels as i32) as i16
            })
            .collect()
    };

    if source_rate == target_rate || mono.is_empty() {
        return mono;
    }

    let ratio = source_rate as f64 / target_rate as f64;
    let out_len = (mono.len() as f64 / ratio) as usize;
    let mut out = Vec::with_capacity(out_len);
    for i in 0..out_len {
        let pos = i as f64 * ratio;
        let idx = pos as usize;
        let frac = pos - idx as f64;
        let a = mono[idx.min(mono.len() - 1)] as f64;
        let b = mono[(idx + 1).min(mono.len() - 1)] as f64;
        out.push((a + (b - a) * frac) as i16);
    }
    out
}

impl AudioSource for CpalAudioSource {
    fn start(&mut self) -> Result<()> {
        {
            let stream_guard = self
                .stream
                .lock()
                .map_err(|e| SightlineError::AudioCapture {
                    message: format!("Failed to lock stream: {}", e),
                })?;
            if stream_guard.is_some() {
                return Ok(()); // Already started
            }
        }

        let stream = self.build_stream()?;
        stream.play().map_err(|e| SightlineError::AudioCapture {
            message: format!("Failed to start audio stream: {}", e),
        })?;

        let mut stream_guard = self
            .stream
            .lock()
            .map_err(|e| SightlineError::AudioCapture {
                message: format!("Failed to lock stream: {}", e),
            })?;
        *stream_guard = Some(SendableStream(stream));
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        let mut stream_guard = self
            .stream
            .lock()
            .map_err(|e| SightlineError::AudioCapture {
                message: format!("Failed to lock stream: {}", e),
            })?;

        if let Some(sendable_stream) = stream_guard.take() {
            sendable_stream
                .0
                .pause()
                .map_err(|e| SightlineError::AudioCapture {
                    message: format!("Failed to stop audio stream: {}", e),
                })?;
        }
        Ok(())
    }

    fn read_samples(&mut self) -> Result<Vec<i16>> {
        let mut buffer = self
            .buffer
            .lock()
            .map_err(|e| SightlineError::AudioCapture {
                message: format!("Failed to lock audio buffer: {}", e),
            })?;

        Ok(std::mem::take(&mut *buffer))
    }
}
