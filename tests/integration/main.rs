mod custom_transport;
mod send_queue;
mod udp_client;
