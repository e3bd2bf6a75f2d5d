use core::ptr;
use std::fs;
use std::path::Path;

use esp_idf_svc::hal::gpio::Pin;
use esp_idf_svc::hal::spi::SpiDriver;
use esp_idf_svc::sys;

use inkframe_core::filesystem::{FileInfo, FileSystem, FileSystemError};

const SD_MOUNT_POINT: &str = "/sd";
const SD_MAX_FILES: i32 = 8;

/// SD card mounted read-only for the slideshow: FAT over SD-SPI, exposed
/// through the core `FileSystem` seam.
pub struct SdCardFs {
    base_path: String,
}

impl SdCardFs {
    pub fn new(spi: &SpiDriver, cs_pin: impl Pin) -> Result<Self, FileSystemError> {
        let base_path = SD_MOUNT_POINT.to_string();
        let c_base = std::ffi::CString::new(base_path.clone())
            .map_err(|_| FileSystemError::IoError("Invalid mount path".into()))?;

        let host = build_sdspi_host(spi.host());
        let slot_config = sys::sdspi_device_config_t {
            host_id: spi.host(),
            gpio_cs: cs_pin.pin(),
            gpio_cd: -1,
            gpio_wp: -1,
            gpio_int: -1,
            gpio_wp_polarity: false,
        };

        let mount_config = sys::esp_vfs_fat_mount_config_t {
            format_if_mount_failed: false,
            max_files: SD_MAX_FILES,
            allocation_unit_size: 0,
            disk_status_check_enable: false,
            use_one_fat: false,
        };

        let res = unsafe {
            sys::esp_vfs_fat_sdspi_mount(
                c_base.as_ptr(),
                &host,
                &slot_config,
                &mount_config,
                ptr::null_mut(),
            )
        };

        if res != sys::ESP_OK {
            return Err(FileSystemError::IoError(format!(
                "SD mount failed: {}",
                res
            )));
        }

        log::info!("SD card mounted at {}", base_path);

        Ok(Self { base_path })
    }

    fn host_path(&self, path: &str) -> String {
        if path == "/" {
            self.base_path.clone()
        } else {
            format!("{}/{}", self.base_path, path.trim_start_matches('/'))
        }
    }
}

fn to_fs_error(err: std::io::Error) -> FileSystemError {
    match err.kind() {
        std::io::ErrorKind::NotFound => FileSystemError::NotFound,
        _ => FileSystemError::IoError(format!("{:?}", err)),
    }
}

impl FileSystem for SdCardFs {
    fn list_files(&mut self, path: &str) -> Result<Vec<FileInfo>, FileSystemError> {
        let host_path = self.host_path(path);
        let mut entries = Vec::new();

        for entry in fs::read_dir(&host_path).map_err(to_fs_error)? {
            let entry = entry.map_err(to_fs_error)?;
            let meta = entry.metadata().map_err(to_fs_error)?;
            let name = entry.file_name().to_string_lossy().to_string();
            entries.push(FileInfo {
                name,
                size: if meta.is_file() { meta.len() } else { 0 },
                is_directory: meta.is_dir(),
            });
        }

        Ok(entries)
    }

    fn read(&mut self, path: &str) -> Result<Vec<u8>, FileSystemError> {
        fs::read(self.host_path(path)).map_err(to_fs_error)
    }

    fn exists(&mut self, path: &str) -> bool {
        Path::new(&self.host_path(path)).exists()
    }

    fn file_info(&mut self, path: &str) -> Result<FileInfo, FileSystemError> {
        let host_path = self.host_path(path);
        let meta = fs::metadata(&host_path).map_err(to_fs_error)?;
        let name = Path::new(path)
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| "/".to_string());
        Ok(FileInfo {
            name,
            size: if meta.is_file() { meta.len() } else { 0 },
            is_directory: meta.is_dir(),
        })
    }
}

fn build_sdspi_host(host_id: sys::spi_host_device_t) -> sys::sdmmc_host_t {
    const SDMMC_HOST_FLAG_SPI: u32 = 1 << 3;
    const SDMMC_HOST_FLAG_DEINIT_ARG: u32 = 1 << 5;

    sys::sdmmc_host_t {
        flags: SDMMC_HOST_FLAG_SPI | SDMMC_HOST_FLAG_DEINIT_ARG,
        slot: host_id as _,
        max_freq_khz: 20_000,
        io_voltage: 3.3,
        init: Some(sys::sdspi_host_init),
        set_bus_width: None,
        get_bus_width: None,
        set_bus_ddr_mode: None,
        set_card_clk: Some(sys::sdspi_host_set_card_clk),
        set_cclk_always_on: None,
        do_transaction: Some(sys::sdspi_host_do_transaction),
        __bindgen_anon_1: sys::sdmmc_host_t__bindgen_ty_1 {
            deinit_p: Some(sys::sdspi_host_remove_device),
        },
        io_int_enable: Some(sys::sdspi_host_io_int_enable),
        io_int_wait: Some(sys::sdspi_host_io_int_wait),
        command_timeout_ms: 0,
        get_real_freq: Some(sys::sdspi_host_get_real_freq),
        input_delay_phase: sys::sdmmc_delay_phase_t_SDMMC_DELAY_PHASE_0,
        set_input_delay: None,
        dma_aligned_buffer: ptr::null_mut(),
        pwr_ctrl_handle: ptr::null_mut(),
        get_dma_info: Some(sys::sdspi_host_get_dma_info),
    }
}
