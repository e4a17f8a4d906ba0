#![no_std]
#![no_main]

mod drivers;
mod tasks;

use button_node::config::NodeConfig;
use button_node::event::EventChannel;
use button_node::ProtocolEngine;
use defmt::{error, info};
use drivers::{AdcSensors, RadioLink, radio::OUTBOUND};
use embassy_executor::Spawner;
use embassy_stm32::adc::{Adc, AdcChannel};
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::gpio::Pull;
use embassy_stm32::usart::{self, Uart};
use embassy_stm32::{Config, bind_interrupts, peripherals};
use embassy_sync::channel::Channel;
use embassy_time::Timer;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

bind_interrupts!(struct Irqs {
    USART2 => usart::InterruptHandler<peripherals::USART2>;
});

// 引脚分配：
// - PB0  按键（上拉，上升沿触发）
// - PA0  电池分压
// - PA1  光敏电阻
// - PA2/PA3  USART2 TX/RX → 无线模块

/// 无线模块串口波特率
const MODEM_BAUDRATE: u32 = 115_200;

#[embassy_executor::main]
async fn main(spawner: Spawner) -> ! {
    let p = embassy_stm32::init(Config::default());
    let config = NodeConfig::default();

    info!("=== Button Node ===");
    info!("Initializing...");

    // 无线模块链路
    let mut uart_config = usart::Config::default();
    uart_config.baudrate = MODEM_BAUDRATE;

    let uart = match Uart::new(
        p.USART2, p.PA3, p.PA2, Irqs, p.DMA1_CH6, p.DMA1_CH5, uart_config,
    ) {
        Ok(uart) => uart,
        Err(e) => {
            error!("Error configuring modem UART: {:?}", e);
            halt().await
        }
    };
    let (mut uart_tx, mut uart_rx) = uart.split();

    if let Err(e) = tasks::radio_task::init_modem(&mut uart_tx, &mut uart_rx, &config).await {
        error!("Error initializing radio link: {:?}", e);
        halt().await
    }

    // 传感器
    let sensors = AdcSensors::new(
        Adc::new(p.ADC1),
        p.PA0.degrade_adc(),
        p.PA1.degrade_adc(),
        config.adc_vref,
        config.battery_divider,
    );

    let engine = ProtocolEngine::new(RadioLink::new(), sensors, config);

    // 事件通道
    static EVENT_CHANNEL: StaticCell<EventChannel> = StaticCell::new();
    let event_channel = EVENT_CHANNEL.init(Channel::new());
    let event_tx = event_channel.sender();
    let event_rx = event_channel.receiver();

    info!("Event system initialized");

    let button = ExtiInput::new(p.PB0, p.EXTI0, Pull::Up);

    info!("Spawning tasks...");

    spawner.spawn(tasks::dispatch_task::dispatch_task(engine, event_rx)).unwrap();
    info!("  - Dispatch task spawned");

    spawner.spawn(tasks::radio_task::radio_rx_task(uart_rx, event_tx.clone())).unwrap();
    spawner.spawn(tasks::radio_task::radio_tx_task(
        uart_tx,
        OUTBOUND.receiver(),
        event_tx.clone(),
    )).unwrap();
    info!("  - Radio tasks spawned");

    spawner.spawn(tasks::button_task::button_task(button, event_tx)).unwrap();
    info!("  - Button task spawned");

    info!("ALL IS READY!");

    // 主循环无事可做，所有工作由事件驱动
    loop {
        Timer::after_secs(60).await;
    }
}

/// 无线链路不可用时停止工作
async fn halt() -> ! {
    loop {
        Timer::after_secs(60).await;
    }
}
