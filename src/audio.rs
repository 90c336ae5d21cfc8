use std::path::{Path, PathBuf};

/// Sample rate every output file is labelled with unless the caller asks
/// otherwise.
pub const OUTPUT_SAMPLE_RATE: u32 = 44100;

#[derive(thiserror::Error, Debug)]
pub enum AudioError {
    #[error("failed to read WAV file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },
    #[error("failed to write WAV file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: hound::Error,
    },
    #[error("sample {index} ({value}) does not fit in 16-bit PCM")]
    SampleOutOfRange { index: usize, value: f64 },
}

/// A mono signal with its sample rate in Hz. Samples keep the amplitude
/// of the source file, integer formats are not normalised.
#[derive(Debug, Clone, PartialEq)]
pub struct Signal {
    pub sample_rate: u32,
    pub samples: Vec<f64>,
}

/// Number of samples spanning `delay_ms` milliseconds at `sample_rate`.
pub fn delay_samples(delay_ms: f64, sample_rate: u32) -> usize {
    (delay_ms * sample_rate as f64 / 1000.0).round() as usize
}

/// Reads `path` and returns the delay in samples for `delay_ms` together
/// with the signal.
pub fn load<P: AsRef<Path>>(path: P, delay_ms: f64) -> Result<(usize, Signal), AudioError> {
    let signal = read(path)?;
    let k = delay_samples(delay_ms, signal.sample_rate);
    log::debug!("{}ms at {} Hz is k={} samples", delay_ms, signal.sample_rate, k);
    Ok((k, signal))
}

/// Reads a WAV file into a mono [`Signal`]. Frames with several channels
/// are averaged.
pub fn read<P: AsRef<Path>>(path: P) -> Result<Signal, AudioError> {
    let path = path.as_ref();
    let read_err = |source| AudioError::Read {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = hound::WavReader::open(path).map_err(read_err)?;
    let spec = reader.spec();
    log::trace!("{}: {:?}", path.display(), spec);

    let interleaved: Vec<f64> = match spec.sample_format {
        hound::SampleFormat::Int => reader
            .samples::<i32>()
            .map(|s| s.map(f64::from))
            .collect::<Result<_, _>>()
            .map_err(read_err)?,
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .map(|s| s.map(f64::from))
            .collect::<Result<_, _>>()
            .map_err(read_err)?,
    };

    let channels = spec.channels.max(1) as usize;
    let samples = if channels == 1 {
        interleaved
    } else {
        log::warn!(
            "{} has {} channels, downmixing to mono",
            path.display(),
            channels
        );
        interleaved
            .chunks(channels)
            .map(|frame| frame.iter().sum::<f64>() / frame.len() as f64)
            .collect()
    };

    Ok(Signal {
        sample_rate: spec.sample_rate,
        samples,
    })
}

/// Layout of the files produced by [`write`]: always mono 16-bit PCM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputFormat {
    pub sample_rate: u32,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat {
            sample_rate: OUTPUT_SAMPLE_RATE,
        }
    }
}

impl OutputFormat {
    pub fn spec(&self) -> hound::WavSpec {
        hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        }
    }
}

/// Truncates a sample toward zero and checks it fits in an `i16`.
fn to_pcm16(index: usize, value: f64) -> Result<i16, AudioError> {
    let truncated = value.trunc();
    if (i16::MIN as f64..=i16::MAX as f64).contains(&truncated) {
        Ok(truncated as i16)
    } else {
        Err(AudioError::SampleOutOfRange { index, value })
    }
}

/// Writes `samples` as a mono 16-bit WAV file. Samples are truncated, not
/// rescaled or clipped; a value that does not fit aborts the write.
pub fn write<P: AsRef<Path>>(
    path: P,
    samples: &[f64],
    format: OutputFormat,
) -> Result<(), AudioError> {
    let path = path.as_ref();
    let write_err = |source| AudioError::Write {
        path: path.to_path_buf(),
        source,
    };
    let pcm = samples
        .iter()
        .enumerate()
        .map(|(i, &s)| to_pcm16(i, s))
        .collect::<Result<Vec<i16>, _>>()?;

    let mut writer = hound::WavWriter::create(path, format.spec()).map_err(write_err)?;
    for sample in pcm {
        writer.write_sample(sample).map_err(write_err)?;
    }
    writer.finalize().map_err(write_err)?;
    log::debug!(
        "wrote {} samples at {} Hz to {}",
        samples.len(),
        format.sample_rate,
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_wav(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("echofilter-{}-{}.wav", std::process::id(), name))
    }

    #[test]
    fn delay_of_fifty_ms_at_cd_rate() {
        assert_eq!(delay_samples(50.0, 44100), 2205);
        assert_eq!(delay_samples(250.0, 44100), 11025);
        assert_eq!(delay_samples(500.0, 44100), 22050);
    }

    #[test]
    fn delay_rounds_to_nearest_sample() {
        assert_eq!(delay_samples(1.0, 22050), 22);
        assert_eq!(delay_samples(0.1, 44100), 4);
        assert_eq!(delay_samples(0.0, 48000), 0);
    }

    #[test]
    fn pcm_conversion_truncates_toward_zero() {
        assert_eq!(to_pcm16(0, 12.9).unwrap(), 12);
        assert_eq!(to_pcm16(0, -12.9).unwrap(), -12);
        assert_eq!(to_pcm16(0, 32767.5).unwrap(), 32767);
        assert_eq!(to_pcm16(0, -32768.7).unwrap(), -32768);
    }

    #[test]
    fn pcm_conversion_rejects_out_of_range_and_nan() {
        assert!(matches!(
            to_pcm16(3, 32768.0),
            Err(AudioError::SampleOutOfRange { index: 3, .. })
        ));
        assert!(to_pcm16(0, -32769.0).is_err());
        assert!(to_pcm16(0, f64::NAN).is_err());
        assert!(to_pcm16(0, f64::INFINITY).is_err());
    }

    #[test]
    fn written_samples_read_back_unchanged() {
        let path = temp_wav("roundtrip");
        let samples = vec![0.0, 1.0, -1.0, 32767.0, -32768.0, 1234.0, -4321.0];
        write(&path, &samples, OutputFormat::default()).unwrap();

        let signal = read(&path).unwrap();
        assert_eq!(signal.sample_rate, OUTPUT_SAMPLE_RATE);
        assert_eq!(signal.samples, samples);

        let reader = hound::WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(spec.sample_format, hound::SampleFormat::Int);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn writer_ignores_input_rate_by_default() {
        let path = temp_wav("fixed-rate");
        write(&path, &[1.0, 2.0], OutputFormat::default()).unwrap();
        let signal = read(&path).unwrap();
        assert_eq!(signal.sample_rate, 44100);
        std::fs::remove_file(&path).unwrap();

        write(&path, &[1.0, 2.0], OutputFormat { sample_rate: 8000 }).unwrap();
        let signal = read(&path).unwrap();
        assert_eq!(signal.sample_rate, 8000);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn write_fails_before_creating_file_on_bad_sample() {
        let path = temp_wav("bad-sample");
        let err = write(&path, &[0.0, 40000.0], OutputFormat::default()).unwrap_err();
        assert!(matches!(err, AudioError::SampleOutOfRange { index: 1, .. }));
        assert!(!path.exists());
    }

    #[test]
    fn stereo_input_is_downmixed() {
        let path = temp_wav("stereo");
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 22050,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for s in [100i16, 300, -50, -150, 7, 7] {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();

        let (k, signal) = load(&path, 10.0).unwrap();
        assert_eq!(k, 221);
        assert_eq!(signal.sample_rate, 22050);
        assert_eq!(signal.samples, vec![200.0, -100.0, 7.0]);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn float_input_keeps_its_values() {
        let path = temp_wav("float");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 48000,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for s in [0.5f32, -0.25, 1.0] {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();

        let signal = read(&path).unwrap();
        assert_eq!(signal.samples, vec![0.5, -0.25, 1.0]);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = read(temp_wav("does-not-exist")).unwrap_err();
        assert!(matches!(err, AudioError::Read { .. }));
    }
}
