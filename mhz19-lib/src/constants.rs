// Protocol constants for the MH-Z19 serial link

/// Every frame on the wire is exactly this long, in both directions
pub const FRAME_LEN: usize = 9;

/// First byte of every frame
pub const HEADER_BYTE: u8 = 0xFF;

/// Bytes covered by the checksum (offsets 1..8)
pub const BODY_LEN: usize = 7;

/// Raw payload of a response frame (offsets 2..8)
pub const PAYLOAD_LEN: usize = 6;

/// Argument area of a request frame (offsets 3..8)
pub const ARGS_LEN: usize = 5;

/// Sensor address sent at offset 1 of every request frame
pub const SENSOR_ADDRESS: u8 = 0x01;

/// Largest offset accepted by the generic config-area commands
pub const CONFIG_OFFSET_MAX: u16 = 0x3FF;

/// Size of the config-area block addressed by one concrete sub-code
pub const CONFIG_BLOCK_SIZE: u16 = 0x100;

/// Argument byte that switches auto-baseline-correction on
pub const ABC_ENABLED: u8 = 0xA0;

/// Leading argument byte of the measurement interval command
pub const MEASURE_INTERVAL_MARKER: u8 = 0x02;

/// Nominal line speed of the sensor UART
pub const DEFAULT_BAUD_RATE: u32 = 9600;
