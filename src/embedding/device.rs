use candle_core::Device;

#[cfg(any(feature = "metal", feature = "cuda"))]
use tracing::{info, warn};

#[cfg(not(any(feature = "metal", feature = "cuda")))]
use tracing::debug;

/// Picks the compute device for the embedder from the enabled cargo features.
///
/// GPU initialisation failures are logged and never fatal: the embedder always has CPU.
pub fn select_device() -> Device {
    #[cfg(any(feature = "metal", feature = "cuda"))]
    let mut failures: Vec<String> = Vec::new();

    #[cfg(feature = "metal")]
    match Device::new_metal(0) {
        Ok(device) => {
            info!("Embedding on Metal GPU");
            return device;
        }
        Err(e) => {
            warn!(error = %e, "Metal device unavailable");
            failures.push(format!("metal: {e}"));
        }
    }

    #[cfg(feature = "cuda")]
    match Device::new_cuda(0) {
        Ok(device) => {
            info!("Embedding on CUDA GPU");
            return device;
        }
        Err(e) => {
            warn!(error = %e, "CUDA device unavailable");
            failures.push(format!("cuda: {e}"));
        }
    }

    #[cfg(any(feature = "metal", feature = "cuda"))]
    warn!(reason = %failures.join("; "), "Falling back to CPU device");

    #[cfg(not(any(feature = "metal", feature = "cuda")))]
    debug!("No GPU backend compiled, embedding on CPU");

    Device::Cpu
}

/// Short label for logs and readiness output.
pub fn device_label(device: &Device) -> &'static str {
    match device {
        Device::Cpu => "cpu",
        Device::Cuda(_) => "cuda",
        Device::Metal(_) => "metal",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(not(any(feature = "metal", feature = "cuda")))]
    fn test_cpu_without_gpu_features() {
        let device = select_device();
        assert_eq!(device_label(&device), "cpu");
    }
}
